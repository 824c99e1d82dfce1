//! Role and status enums for tracker entities.
//!
//! All enums share one wire format: a lowercase string (`"in_progress"`,
//! `"super-admin"`). Parsing trims and lowercases the input and accepts a few
//! historical aliases. Unknown strings fail to parse; record fields holding
//! these enums use the lenient deserializers in [`crate::de`] so an unknown
//! value becomes `None` instead of failing the whole record.

use core::fmt;
use std::str::FromStr;

/// Error returned when a string does not name a known variant.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid {kind}: {value}")]
pub struct UnknownVariant {
    /// Name of the enum that failed to parse.
    pub kind: &'static str,
    /// The rejected input.
    pub value: String,
}

/// An enum whose complete set of values is known up front.
///
/// Counting selectors seed one zero bucket per value so their output always
/// carries the same keys.
pub trait Bucket: Copy + Ord + 'static {
    /// Every value, in declaration order.
    fn all() -> &'static [Self];
}

macro_rules! define_status {
    (
        $(#[$meta:meta])*
        $name:ident {
            $(
                $(#[$vmeta:meta])*
                $variant:ident => $wire:literal $(| $alias:literal)*
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum $name {
            $(
                $(#[$vmeta])*
                $variant,
            )+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Wire name of this variant.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $wire),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_ascii_lowercase().as_str() {
                    $($wire $(| $alias)* => Ok(Self::$variant),)+
                    _ => Err(UnknownVariant {
                        kind: stringify!($name),
                        value: s.to_owned(),
                    }),
                }
            }
        }

        impl ::serde::Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: ::serde::Serializer,
            {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> ::serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: ::serde::Deserializer<'de>,
            {
                let raw = <String as ::serde::Deserialize>::deserialize(deserializer)?;
                raw.parse().map_err(::serde::de::Error::custom)
            }
        }

        impl Bucket for $name {
            fn all() -> &'static [Self] {
                Self::ALL
            }
        }
    };
}

define_status! {
    /// User role. Determines which routes, sidebar entries and collections a
    /// user can reach.
    Role {
        /// Full access to everything, including user management.
        SuperAdmin => "super-admin" | "super_admin" | "superadmin",
        /// Schedules and assigns field work.
        Supervisor => "supervisor",
        /// Field technician assignable to orders.
        Installer => "installer",
        /// Invoicing and financial reporting.
        Accountant => "accountant",
        /// Material stock management.
        Warehouse => "warehouse",
    }
}

define_status! {
    /// Lifecycle status of a field order.
    OrderStatus {
        Pending => "pending",
        Assigned => "assigned",
        InProgress => "in_progress" | "in-progress",
        Completed => "completed",
        Cancelled => "cancelled" | "canceled",
    }
}

define_status! {
    /// Kind of field work an order represents.
    OrderType {
        Activation => "activation",
        Modification => "modification",
        Assurance => "assurance",
    }
}

define_status! {
    /// Cabling type of a building.
    BuildingType {
        Prelaid => "prelaid",
        NonPrelaid => "non_prelaid" | "non-prelaid",
        Both => "both",
    }
}

define_status! {
    /// Status of an internal task or project.
    TaskStatus {
        Todo => "todo",
        InProgress => "in_progress" | "in-progress",
        Completed => "completed",
        Cancelled => "cancelled" | "canceled",
    }
}

define_status! {
    /// Priority of an internal task or project.
    Priority {
        High => "high",
        Medium => "medium",
        Low => "low",
    }
}

define_status! {
    /// Derived stock level of a material.
    StockState {
        InStock => "in_stock",
        LowStock => "low_stock",
        OutOfStock => "out_of_stock",
    }
}

impl OrderStatus {
    const fn rank(self) -> u8 {
        match self {
            Self::Pending => 0,
            Self::Assigned => 1,
            Self::InProgress => 2,
            Self::Completed => 3,
            Self::Cancelled => 4,
        }
    }

    /// Returns true for statuses no further transition may leave.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    /// Whether an order may move from `self` to `next`.
    ///
    /// Statuses only move forward through pending → assigned → in progress →
    /// completed. `Cancelled` is reachable from any non-terminal status.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        if self.is_terminal() {
            return false;
        }
        match next {
            Self::Cancelled => true,
            _ => next.rank() > self.rank(),
        }
    }
}

impl TaskStatus {
    /// Returns true for completed or cancelled work.
    #[must_use]
    pub const fn is_closed(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trips_through_display() {
        for role in Role::ALL {
            assert_eq!(role.to_string().parse::<Role>().unwrap(), *role);
        }
    }

    #[test]
    fn test_role_aliases() {
        assert_eq!("super_admin".parse::<Role>().unwrap(), Role::SuperAdmin);
        assert_eq!(" Supervisor ".parse::<Role>().unwrap(), Role::Supervisor);
        assert!("manager".parse::<Role>().is_err());
    }

    #[test]
    fn test_unknown_variant_message() {
        let err = "shipped".parse::<OrderStatus>().unwrap_err();
        assert_eq!(err.to_string(), "invalid OrderStatus: shipped");
    }

    #[test]
    fn test_order_status_forward_transitions() {
        assert!(OrderStatus::Pending.can_transition_to(OrderStatus::Assigned));
        assert!(OrderStatus::Pending.can_transition_to(OrderStatus::InProgress));
        assert!(OrderStatus::InProgress.can_transition_to(OrderStatus::Completed));
        assert!(!OrderStatus::InProgress.can_transition_to(OrderStatus::Assigned));
        assert!(!OrderStatus::Assigned.can_transition_to(OrderStatus::Assigned));
    }

    #[test]
    fn test_order_status_cancellation() {
        assert!(OrderStatus::Pending.can_transition_to(OrderStatus::Cancelled));
        assert!(OrderStatus::InProgress.can_transition_to(OrderStatus::Cancelled));
        assert!(!OrderStatus::Completed.can_transition_to(OrderStatus::Cancelled));
        assert!(!OrderStatus::Cancelled.can_transition_to(OrderStatus::Pending));
    }

    #[test]
    fn test_status_serde_uses_wire_names() {
        let json = serde_json::to_string(&OrderStatus::InProgress).unwrap();
        assert_eq!(json, "\"in_progress\"");
        let parsed: BuildingType = serde_json::from_str("\"non-prelaid\"").unwrap();
        assert_eq!(parsed, BuildingType::NonPrelaid);
    }
}

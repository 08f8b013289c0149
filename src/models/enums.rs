use crate::store::StoreError;
use serde::{Deserialize, Serialize};

/// Macro to generate enum with as_str + std::str::FromStr pattern.
/// The wire form (serde) is the same string as `as_str`.
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $s)] $variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$(Self::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = StoreError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(StoreError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }
    };
}

str_enum!(StaffRole {
    Doctor => "doctor",
    Nurse => "nurse",
    Therapist => "therapist",
});

// Seeded appointments are always already seen and admissions already closed.
str_enum!(AppointmentStatus {
    Seen => "seen",
});

str_enum!(AdmissionStatus {
    Discharged => "discharged",
});

str_enum!(Ward {
    General => "General",
    SemiPrivate => "Semi-Private",
    Private => "Private",
    Icu => "ICU",
});

str_enum!(RequestStatus {
    Pending => "pending",
    Completed => "completed",
});

str_enum!(Priority {
    Low => "low",
    Normal => "normal",
    High => "high",
    Urgent => "urgent",
});

str_enum!(TimeSlot {
    Morning => "M",
    Afternoon => "A",
    Evening => "E",
    Night => "N",
});

impl Ward {
    /// Bed-number prefixes; not tied to the ward the patient lands in.
    pub const BED_PREFIXES: &'static [&'static str] = &["G", "S", "P", "ICU"];
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn ward_round_trips_display_names() {
        assert_eq!(Ward::SemiPrivate.as_str(), "Semi-Private");
        assert_eq!(Ward::from_str("ICU").unwrap(), Ward::Icu);
    }

    #[test]
    fn unknown_value_is_invalid_enum() {
        let err = StaffRole::from_str("surgeon").unwrap_err();
        assert!(matches!(err, StoreError::InvalidEnum { .. }));
        // Roles the seeder never looks up are not modelled.
        assert!(StaffRole::from_str("pharmacist").is_err());
    }

    #[test]
    fn serde_uses_wire_strings() {
        assert_eq!(
            serde_json::to_value(AdmissionStatus::Discharged).unwrap(),
            serde_json::json!("discharged")
        );
        let slot: TimeSlot = serde_json::from_str("\"N\"").unwrap();
        assert_eq!(slot, TimeSlot::Night);
    }

    #[test]
    fn all_lists_every_variant() {
        assert_eq!(Priority::ALL.len(), 4);
        assert_eq!(Ward::ALL.len(), Ward::BED_PREFIXES.len());
    }
}

//! Physical pin and ADC channel identifiers for the Hellen 144-pin board family.
//!
//! Names follow the board schematics (`H144_LS_1`, `H144_OUT_IO13`, ...) rather
//! than Rust casing so that they can be matched against the pinout sheets and
//! used as-is in TOML configuration files.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown {kind} identifier '{name}'")]
pub struct UnknownIdentifier {
    pub kind: &'static str,
    pub name: String,
}

macro_rules! define_pins {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident : $kind:literal {
            $( $(#[$vmeta:meta])* $variant:ident ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[allow(non_camel_case_types)]
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        $vis enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[ $( $name::$variant ),+ ];

            pub fn name(&self) -> &'static str {
                match self {
                    $( $name::$variant => stringify!($variant) ),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.pad(self.name())
            }
        }

        impl std::str::FromStr for $name {
            type Err = UnknownIdentifier;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $( stringify!($variant) => Ok($name::$variant), )+
                    _ => Err(UnknownIdentifier { kind: $kind, name: s.to_string() }),
                }
            }
        }
    };
}

define_pins! {
    /// Hardware routing for a digital pin or peripheral line.
    pub enum Gpio: "gpio" {
        #[default]
        Unassigned,

        // low-side drivers
        H144_LS_1, H144_LS_2, H144_LS_3, H144_LS_4,
        H144_LS_5, H144_LS_6, H144_LS_7, H144_LS_8,

        // ignition pre-drivers
        H144_IGN_1, H144_IGN_2, H144_IGN_3, H144_IGN_4,
        H144_IGN_5, H144_IGN_6, H144_IGN_7, H144_IGN_8,

        // general purpose outputs
        H144_OUT_IO1, H144_OUT_IO2, H144_OUT_IO3, H144_OUT_IO4,
        H144_OUT_IO5, H144_OUT_IO6, H144_OUT_IO7, H144_OUT_IO8,
        H144_OUT_IO9, H144_OUT_IO10, H144_OUT_IO11, H144_OUT_IO12,
        H144_OUT_IO13,

        H144_OUT_PWM1, H144_OUT_PWM2, H144_OUT_PWM3, H144_OUT_PWM4,
        H144_OUT_PWM5, H144_OUT_PWM6, H144_OUT_PWM7, H144_OUT_PWM8,

        H144_GP1, H144_GP2, H144_GP3, H144_GP4, H144_GP5,

        // trigger inputs
        H144_IN_CRANK, H144_IN_CAM,

        // mega-module and shared Hellen peripherals
        MM176_EN,
        H_SPI1_CS1, H_SPI1_CS2, H_SPI2_CS,
        H_CAN_RX, H_CAN_TX,
    }
}

define_pins! {
    /// Analog input channel.
    pub enum AdcChannel: "adc channel" {
        #[default]
        Unassigned,

        EFI_ADC_0, EFI_ADC_1, EFI_ADC_2, EFI_ADC_3,
        EFI_ADC_4, EFI_ADC_5, EFI_ADC_6, EFI_ADC_7,
        EFI_ADC_8, EFI_ADC_9, EFI_ADC_10, EFI_ADC_11,
        EFI_ADC_12, EFI_ADC_13, EFI_ADC_14, EFI_ADC_15,

        H144_IN_VBATT,
        H144_IN_TPS, H144_IN_PPS,
        H144_IN_AUX1, H144_IN_AUX2,
        H144_IN_CLT, H144_IN_IAT,
        H144_IN_MAP3,
    }
}

impl Gpio {
    pub fn is_assigned(&self) -> bool {
        *self != Gpio::Unassigned
    }
}

impl AdcChannel {
    pub fn is_assigned(&self) -> bool {
        *self != AdcChannel::Unassigned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gpio_name_matches_schematic() {
        assert_eq!(Gpio::H144_OUT_IO13.name(), "H144_OUT_IO13");
        assert_eq!(Gpio::H144_GP3.to_string(), "H144_GP3");
        assert_eq!("H144_LS_5".parse::<Gpio>(), Ok(Gpio::H144_LS_5));
    }

    #[test]
    fn test_unknown_identifier_is_rejected() {
        let err = "H144_LS_99".parse::<Gpio>().unwrap_err();
        assert_eq!(err.kind, "gpio");
        assert_eq!(err.name, "H144_LS_99");
        assert!("PA0".parse::<AdcChannel>().is_err());
    }

    #[test]
    fn test_default_is_unassigned() {
        assert_eq!(Gpio::default(), Gpio::Unassigned);
        assert!(!Gpio::default().is_assigned());
        assert!(!AdcChannel::default().is_assigned());
        assert!(AdcChannel::H144_IN_CLT.is_assigned());
    }

    #[test]
    fn test_all_names_parse_back() {
        for pin in Gpio::ALL {
            assert_eq!(pin.name().parse::<Gpio>().unwrap(), *pin);
        }
    }
}

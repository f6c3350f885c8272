//! Tagged union over the closed-form viscosity models.

use crate::bi_power_law::BiPowerLaw;
use crate::carreau::Carreau;
use crate::herschel_bulkley::HerschelBulkley;
use crate::model::ViscosityModel;
use crate::newtonian::Newtonian;
use crate::power_law::PowerLaw;
use crate::three_component::ThreeComponent;
use rf_core::Real;

/// Any closed-form viscosity model, dispatched by variant.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "model", rename_all = "snake_case"))]
pub enum Viscosity {
    Newtonian(Newtonian),
    PowerLaw(PowerLaw),
    Carreau(Carreau),
    HerschelBulkley(HerschelBulkley),
    ThreeComponent(ThreeComponent),
    BiPowerLaw(BiPowerLaw),
}

impl ViscosityModel for Viscosity {
    fn name(&self) -> &str {
        match self {
            Viscosity::Newtonian(m) => m.name(),
            Viscosity::PowerLaw(m) => m.name(),
            Viscosity::Carreau(m) => m.name(),
            Viscosity::HerschelBulkley(m) => m.name(),
            Viscosity::ThreeComponent(m) => m.name(),
            Viscosity::BiPowerLaw(m) => m.name(),
        }
    }

    fn viscosity(&self, rate: Real) -> Real {
        match self {
            Viscosity::Newtonian(m) => m.viscosity(rate),
            Viscosity::PowerLaw(m) => m.viscosity(rate),
            Viscosity::Carreau(m) => m.viscosity(rate),
            Viscosity::HerschelBulkley(m) => m.viscosity(rate),
            Viscosity::ThreeComponent(m) => m.viscosity(rate),
            Viscosity::BiPowerLaw(m) => m.viscosity(rate),
        }
    }
}

macro_rules! impl_from_model {
    ($($variant:ident),* $(,)?) => {
        $(
            impl From<$variant> for Viscosity {
                fn from(model: $variant) -> Self {
                    Viscosity::$variant(model)
                }
            }
        )*
    };
}

impl_from_model!(
    Newtonian,
    PowerLaw,
    Carreau,
    HerschelBulkley,
    ThreeComponent,
    BiPowerLaw,
);


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::herschel_bulkley::Regularization;
    use proptest::prelude::*;

    fn all_defaults() -> Vec<Viscosity> {
        vec![
            Newtonian::default().into(),
            PowerLaw::default().into(),
            Carreau::default().into(),
            HerschelBulkley::default().into(),
            HerschelBulkley::new(1.0, 1.0, 0.5, Regularization::None)
                .unwrap()
                .into(),
            ThreeComponent::default().into(),
            BiPowerLaw::default().into(),
        ]
    }

    proptest! {
        #[test]
        fn viscosity_is_positive_and_finite(exp in -9.0_f64..9.0) {
            let rate = 10.0_f64.powf(exp);
            for model in all_defaults() {
                let eta = model.viscosity(rate);
                prop_assert!(eta.is_finite(), "{} not finite at {rate}", model.name());
                prop_assert!(eta > 0.0, "{} not positive at {rate}", model.name());
            }
        }

        #[test]
        fn stress_is_non_decreasing_for_default_models(exp in -3.0_f64..5.0) {
            let rate = 10.0_f64.powf(exp);
            for model in all_defaults() {
                prop_assert!(model.stress(rate * 1.01) >= model.stress(rate));
            }
        }
    }
}

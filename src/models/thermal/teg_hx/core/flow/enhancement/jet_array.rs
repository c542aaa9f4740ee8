use std::f64::consts::PI;

use uom::si::{
    f64::Length,
    length::{meter, millimeter},
};

use super::{
    super::FlowRegime, ConfigError, Convection, DomainError, Duct, DuctFlow, EnhancementModel,
    FlowGeometry, positive,
};

/// Square array of round jets impinging on the heated plate.
///
/// The whole duct flow is issued through the jets of one node. Heat transfer
/// follows Martin's correlation for nozzle arrays, with the duct height as the
/// nozzle-to-plate distance. The pressure drop is one jet dynamic head.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JetArray {
    pub jet_diameter: Length,
    /// Center-to-center distance between neighboring jets.
    pub pitch: Length,
}

impl Default for JetArray {
    fn default() -> Self {
        Self {
            jet_diameter: Length::new::<millimeter>(1.0),
            pitch: Length::new::<millimeter>(5.0),
        }
    }
}

impl JetArray {
    /// Nozzle area over plate area.
    fn open_fraction(diameter: f64, pitch: f64) -> f64 {
        PI * diameter * diameter / (4.0 * pitch * pitch)
    }

    fn jet_velocity(&self, flow: &DuctFlow) -> f64 {
        let (d, pitch) = (self.jet_diameter.get::<meter>(), self.pitch.get::<meter>());
        let plate = flow.node_length * flow.geometry.width;
        let nozzle_area = plate * Self::open_fraction(d, pitch);
        flow.mass_rate / (flow.fluid.density * nozzle_area)
    }
}

impl EnhancementModel for JetArray {
    fn geometry(&self, duct: &Duct) -> Result<FlowGeometry, ConfigError> {
        let d = positive("jet_array.jet_diameter", self.jet_diameter)?;
        let pitch = positive("jet_array.pitch", self.pitch)?;
        if pitch <= d {
            return Err(ConfigError::invalid(
                "jet_array.pitch",
                format!("pitch {pitch} m must exceed jet diameter {d} m"),
            ));
        }
        duct.geometry()
    }

    fn convection(&self, flow: &DuctFlow) -> Result<Convection, DomainError> {
        let d = self.jet_diameter.get::<meter>();
        let fraction = Self::open_fraction(d, self.pitch.get::<meter>());
        let fluid = flow.fluid;

        let reynolds = self.jet_velocity(flow) * d / fluid.kinematic_viscosity();
        if !(reynolds > 0.0 && reynolds.is_finite()) {
            return Err(DomainError::UndefinedFlow {
                context: "jet Reynolds number",
            });
        }

        let root_f = fraction.sqrt();
        let spacing = flow.geometry.height / d;
        let k = (1.0 + (spacing / (0.6 / root_f)).powi(6)).powf(-0.05);
        let g = 2.0 * root_f * (1.0 - 2.2 * root_f) / (1.0 + 0.2 * (spacing - 6.0) * root_f);
        let nusselt = k * g * 0.5 * reynolds.powf(2.0 / 3.0) * fluid.prandtl.powf(0.42);
        if !(nusselt > 0.0) {
            return Err(DomainError::non_physical(format!(
                "jet array with open fraction {fraction} yields Nusselt number {nusselt}"
            )));
        }

        Ok(Convection {
            reynolds,
            nusselt,
            friction_factor: 1.0,
            h: nusselt * fluid.conductivity / d,
            regime: FlowRegime::from_reynolds(reynolds),
        })
    }

    fn pressure_drop(&self, flow: &DuctFlow, convection: &Convection) -> f64 {
        convection.friction_factor * 0.5 * flow.fluid.density * self.jet_velocity(flow).powi(2)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use uom::si::length::centimeter;

    use super::{
        super::super::{FluidProperties, HeatedSides},
        *,
    };

    fn duct() -> Duct {
        Duct {
            height: Length::new::<centimeter>(1.0),
            width: Length::new::<centimeter>(10.0),
            sides: HeatedSides::One,
            count: 1,
        }
    }

    fn flow(jets: &JetArray) -> DuctFlow {
        DuctFlow {
            mass_rate: 0.01,
            fluid: FluidProperties::WATER,
            geometry: jets.geometry(&duct()).unwrap(),
            node_length: 0.01,
        }
    }

    #[test]
    fn martin_correlation() {
        let jets = JetArray::default();
        let flow = flow(&jets);
        let convection = jets.convection(&flow).unwrap();

        let f = PI / 100.0;
        let plate = 0.01 * 0.1;
        let velocity = 0.01 / (1000.0 * plate * f);
        let re = velocity * 1e-3 / (5.3e-4 / 1000.0);
        assert_relative_eq!(convection.reynolds, re, max_relative = 1e-12);

        let k = (1.0 + (10.0 / (0.6 / f.sqrt())).powi(6)).powf(-0.05);
        let g = 2.0 * f.sqrt() * (1.0 - 2.2 * f.sqrt()) / (1.0 + 0.2 * 4.0 * f.sqrt());
        let nu = k * g * 0.5 * re.powf(2.0 / 3.0) * 6.22_f64.powf(0.42);
        assert_relative_eq!(convection.nusselt, nu, max_relative = 1e-12);
    }

    #[test]
    fn pressure_drop_is_one_jet_head() {
        let jets = JetArray::default();
        let flow = flow(&jets);
        let convection = jets.convection(&flow).unwrap();

        let velocity = jets.jet_velocity(&flow);
        assert_relative_eq!(
            jets.pressure_drop(&flow, &convection),
            500.0 * velocity * velocity,
            max_relative = 1e-12
        );
    }

    #[test]
    fn pitch_must_exceed_diameter() {
        let jets = JetArray {
            pitch: Length::new::<millimeter>(0.5),
            ..JetArray::default()
        };
        assert!(jets.geometry(&duct()).is_err());
    }
}

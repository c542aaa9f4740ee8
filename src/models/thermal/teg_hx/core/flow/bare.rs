use super::{
    super::{ConfigError, DomainError},
    Convection, Duct, DuctFlow, EnhancementModel, FlowGeometry, FlowRegime, HeatedSides,
};

/// Smooth parallel-plate duct with no enhancement.
///
/// Laminar flow uses the fully developed constant-temperature Nusselt
/// numbers for parallel plates. Turbulent flow uses the Dittus-Boelter form
/// scaled from circular tubes to plates, with a friction factor scaled the
/// same way.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BareDuct;

const DITTUS_BOELTER: f64 = 0.023;
const TUBE_LAMINAR_NU: f64 = 4.364;

impl BareDuct {
    /// Parallel-plate correlations on a given geometry.
    ///
    /// Shared with enhancements that split the duct into smaller plate
    /// channels.
    pub(super) fn plate_convection(flow: &DuctFlow) -> Result<Convection, DomainError> {
        let reynolds = flow.reynolds();
        if !(reynolds > 0.0 && reynolds.is_finite()) {
            return Err(DomainError::UndefinedFlow {
                context: "parallel-plate Reynolds number",
            });
        }

        let regime = FlowRegime::from_reynolds(reynolds);
        let (nusselt, friction_factor) = match (regime, flow.geometry.sides) {
            (FlowRegime::Laminar, HeatedSides::Two) => (7.54, 24.0 / reynolds),
            (FlowRegime::Laminar, HeatedSides::One) => (5.385, 24.0 / reynolds),
            (FlowRegime::Turbulent, sides) => {
                let plate_scale = match sides {
                    HeatedSides::Two => 8.235 / TUBE_LAMINAR_NU,
                    HeatedSides::One => 5.385 / TUBE_LAMINAR_NU,
                };
                let nusselt = plate_scale
                    * DITTUS_BOELTER
                    * reynolds.powf(0.8)
                    * flow.fluid.prandtl.powf(1.0 / 3.0);
                (nusselt, 1.5 * 0.078 * reynolds.powf(-0.25))
            }
        };

        Ok(Convection {
            reynolds,
            nusselt,
            friction_factor,
            h: nusselt * flow.fluid.conductivity / flow.geometry.hydraulic_diameter,
            regime,
        })
    }

    /// Wall-friction pressure drop `f P L / A · ½ρv²`.
    pub(super) fn friction_pressure_drop(flow: &DuctFlow, friction_factor: f64) -> f64 {
        friction_factor * flow.geometry.perimeter * flow.node_length / flow.geometry.flow_area
            * flow.dynamic_pressure()
    }
}

impl EnhancementModel for BareDuct {
    fn geometry(&self, duct: &Duct) -> Result<FlowGeometry, ConfigError> {
        duct.geometry()
    }

    fn convection(&self, flow: &DuctFlow) -> Result<Convection, DomainError> {
        Self::plate_convection(flow)
    }

    fn pressure_drop(&self, flow: &DuctFlow, convection: &Convection) -> f64 {
        Self::friction_pressure_drop(flow, convection.friction_factor)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::{super::FluidProperties, *};

    fn flow(mass_rate: f64, sides: HeatedSides) -> DuctFlow {
        let (height, width) = (0.01, 0.1);
        DuctFlow {
            mass_rate,
            fluid: FluidProperties::WATER,
            geometry: FlowGeometry {
                height,
                width,
                sides,
                flow_area: height * width,
                perimeter: 2.0 * (height + width),
                hydraulic_diameter: 2.0 * height * width / (height + width),
            },
            node_length: 0.01,
        }
    }

    #[test]
    fn laminar_plates() {
        let slow = flow(0.01, HeatedSides::Two);
        let convection = BareDuct.convection(&slow).unwrap();

        assert_eq!(convection.regime, FlowRegime::Laminar);
        assert_relative_eq!(convection.nusselt, 7.54);
        assert_relative_eq!(convection.friction_factor, 24.0 / slow.reynolds());

        let one_sided = BareDuct.convection(&flow(0.01, HeatedSides::One)).unwrap();
        assert_relative_eq!(one_sided.nusselt, 5.385);
    }

    #[test]
    fn turbulent_plates() {
        let fast = flow(1.0, HeatedSides::Two);
        let convection = BareDuct.convection(&fast).unwrap();
        let re = fast.reynolds();

        assert_eq!(convection.regime, FlowRegime::Turbulent);
        assert_relative_eq!(
            convection.nusselt,
            8.235 / 4.364 * 0.023 * re.powf(0.8) * 6.22_f64.powf(1.0 / 3.0),
            max_relative = 1e-12
        );
        assert_relative_eq!(
            convection.friction_factor,
            0.117 * re.powf(-0.25),
            max_relative = 1e-12
        );
    }

    #[test]
    fn one_heated_side_has_lower_turbulent_nusselt() {
        let two = BareDuct.convection(&flow(1.0, HeatedSides::Two)).unwrap();
        let one = BareDuct.convection(&flow(1.0, HeatedSides::One)).unwrap();

        assert_relative_eq!(one.nusselt / two.nusselt, 5.385 / 8.235, max_relative = 1e-12);
    }

    #[test]
    fn pressure_drop_scales_with_node_length() {
        let short = flow(1.0, HeatedSides::Two);
        let long = DuctFlow {
            node_length: 0.03,
            ..short
        };
        let convection = BareDuct.convection(&short).unwrap();

        assert_relative_eq!(
            BareDuct.pressure_drop(&long, &convection),
            3.0 * BareDuct.pressure_drop(&short, &convection),
            max_relative = 1e-12
        );
    }

    #[test]
    fn stalled_flow_is_undefined() {
        assert!(matches!(
            BareDuct.convection(&flow(0.0, HeatedSides::Two)),
            Err(DomainError::UndefinedFlow { .. })
        ));
    }
}

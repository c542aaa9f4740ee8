use uom::si::{
    f64::Length,
    length::{meter, millimeter},
};

use super::{
    super::{BareDuct, FlowRegime},
    ConfigError, Convection, DomainError, Duct, DuctFlow, EnhancementModel, FlowGeometry,
    fin_area_ratio, finned_channels, positive,
};

/// Offset strip fins rated with the Manglik-Bergles correlations.
///
/// Fins span the duct height and are cut into strips of `strip_length`,
/// each row offset by half a pitch. Fin efficiency is taken as one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OffsetStripFin {
    pub thickness: Length,
    /// Clear gap between neighboring fins.
    pub spacing: Length,
    /// Streamwise length of one strip.
    pub strip_length: Length,
}

impl Default for OffsetStripFin {
    fn default() -> Self {
        Self {
            thickness: Length::new::<millimeter>(0.25),
            spacing: Length::new::<millimeter>(3.0),
            strip_length: Length::new::<millimeter>(10.0),
        }
    }
}

/// Dimensionless ratios `(α, δ, γ)`: `s/h`, `t/l` and `t/s`.
fn ratios(height: f64, spacing: f64, thickness: f64, strip_length: f64) -> (f64, f64, f64) {
    (spacing / height, thickness / strip_length, thickness / spacing)
}

impl OffsetStripFin {
    fn raw(&self) -> (f64, f64, f64) {
        (
            self.spacing.get::<meter>(),
            self.thickness.get::<meter>(),
            self.strip_length.get::<meter>(),
        )
    }
}

impl EnhancementModel for OffsetStripFin {
    fn geometry(&self, duct: &Duct) -> Result<FlowGeometry, ConfigError> {
        let s = positive("offset_strip_fin.spacing", self.spacing)?;
        let t = positive("offset_strip_fin.thickness", self.thickness)?;
        let l = positive("offset_strip_fin.strip_length", self.strip_length)?;

        let channels = finned_channels(&duct.geometry()?, s, t)?;
        let h = channels.height;
        let hydraulic_diameter = 4.0 * s * h * l / (2.0 * (s * l + h * l + t * h) + t * s);

        Ok(FlowGeometry {
            perimeter: 4.0 * channels.flow_area / hydraulic_diameter,
            hydraulic_diameter,
            ..channels
        })
    }

    fn convection(&self, flow: &DuctFlow) -> Result<Convection, DomainError> {
        let reynolds = flow.reynolds();
        if !(reynolds > 0.0 && reynolds.is_finite()) {
            return Err(DomainError::UndefinedFlow {
                context: "offset strip fin Reynolds number",
            });
        }

        let (s, t, l) = self.raw();
        let (alpha, delta, gamma) = ratios(flow.geometry.height, s, t, l);

        let colburn = 0.6522
            * reynolds.powf(-0.5403)
            * alpha.powf(-0.1541)
            * delta.powf(0.1499)
            * gamma.powf(-0.0678)
            * (1.0
                + 5.269e-5
                    * reynolds.powf(1.340)
                    * alpha.powf(0.504)
                    * delta.powf(0.456)
                    * gamma.powf(-1.055))
            .powf(0.1);
        let friction_factor = 9.6243
            * reynolds.powf(-0.7422)
            * alpha.powf(-0.1856)
            * delta.powf(0.3053)
            * gamma.powf(-0.2659)
            * (1.0
                + 7.669e-8
                    * reynolds.powf(4.429)
                    * alpha.powf(0.920)
                    * delta.powf(3.767)
                    * gamma.powf(0.236))
            .powf(0.1);

        let fluid = flow.fluid;
        let mass_flux = fluid.density * flow.velocity();
        let h_fin = colburn * mass_flux * fluid.specific_heat / fluid.prandtl.powf(2.0 / 3.0);

        Ok(Convection {
            reynolds,
            nusselt: h_fin * flow.geometry.hydraulic_diameter / fluid.conductivity,
            friction_factor,
            h: h_fin * fin_area_ratio(&flow.geometry, s, t),
            regime: FlowRegime::from_reynolds(reynolds),
        })
    }

    fn pressure_drop(&self, flow: &DuctFlow, convection: &Convection) -> f64 {
        BareDuct::friction_pressure_drop(flow, convection.friction_factor)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use uom::si::{f64::Pressure, length::centimeter, pressure::kilopascal};

    use super::{
        super::{
            super::{FluidModel, HeatedSides},
            IdealFin,
        },
        *,
    };

    fn duct() -> Duct {
        Duct {
            height: Length::new::<centimeter>(1.0),
            width: Length::new::<centimeter>(10.0),
            sides: HeatedSides::Two,
            count: 1,
        }
    }

    fn exhaust(fin: &OffsetStripFin, mass_rate: f64) -> DuctFlow {
        let air = FluidModel::Air {
            pressure: Pressure::new::<kilopascal>(101.325),
        };
        DuctFlow {
            mass_rate,
            fluid: air.properties(600.0).unwrap(),
            geometry: fin.geometry(&duct()).unwrap(),
            node_length: 0.01,
        }
    }

    #[test]
    fn hydraulic_diameter() {
        let geometry = OffsetStripFin::default().geometry(&duct()).unwrap();

        let (s, h, t, l) = (3e-3, 1e-2, 0.25e-3, 1e-2);
        let expected = 4.0 * s * h * l / (2.0 * (s * l + h * l + t * h) + t * s);
        assert_relative_eq!(geometry.hydraulic_diameter, expected, max_relative = 1e-12);
        assert_relative_eq!(
            4.0 * geometry.flow_area / geometry.perimeter,
            expected,
            max_relative = 1e-12
        );
    }

    #[test]
    fn laminar_limit_of_the_correlations() {
        let fin = OffsetStripFin::default();
        let flow = exhaust(&fin, 0.002);
        let convection = fin.convection(&flow).unwrap();

        let re = flow.reynolds();
        assert!(re < 1000.0);
        // The bracketed transition terms are near one at low Reynolds number.
        let (alpha, delta, gamma) = (0.3_f64, 0.025_f64, 0.25_f64 / 3.0);
        let f_laminar = 9.6243
            * re.powf(-0.7422)
            * alpha.powf(-0.1856)
            * delta.powf(0.3053)
            * gamma.powf(-0.2659);
        assert_relative_eq!(convection.friction_factor, f_laminar, max_relative = 0.02);
    }

    #[test]
    fn strips_beat_plain_fins_in_laminar_flow() {
        let strips = OffsetStripFin::default();
        let plain = IdealFin {
            thickness: strips.thickness,
            spacing: strips.spacing,
        };
        let flow = exhaust(&strips, 0.01);
        let plain_flow = DuctFlow {
            geometry: plain.geometry(&duct()).unwrap(),
            ..flow
        };

        let h_strips = strips.convection(&flow).unwrap().h;
        let h_plain = plain.convection(&plain_flow).unwrap().h;

        assert!(h_strips > h_plain);
    }
}

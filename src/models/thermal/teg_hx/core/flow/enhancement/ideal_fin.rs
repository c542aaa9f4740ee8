use uom::si::{
    f64::Length,
    length::{meter, millimeter},
};

use super::{
    super::BareDuct, ConfigError, Convection, DomainError, Duct, DuctFlow, EnhancementModel,
    FlowGeometry, fin_area_ratio, finned_channels, positive,
};

/// Straight continuous fins spanning the duct, with 100 % fin efficiency.
///
/// The duct becomes a row of narrow plate channels. Each channel uses the
/// bare-duct correlations and the film coefficient is scaled by the wetted
/// area per unit plate area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IdealFin {
    pub thickness: Length,
    /// Clear gap between neighboring fins.
    pub spacing: Length,
}

impl Default for IdealFin {
    fn default() -> Self {
        Self {
            thickness: Length::new::<millimeter>(1.0),
            spacing: Length::new::<millimeter>(5.0),
        }
    }
}

impl EnhancementModel for IdealFin {
    fn geometry(&self, duct: &Duct) -> Result<FlowGeometry, ConfigError> {
        let spacing = positive("ideal_fin.spacing", self.spacing)?;
        let thickness = positive("ideal_fin.thickness", self.thickness)?;
        finned_channels(&duct.geometry()?, spacing, thickness)
    }

    fn convection(&self, flow: &DuctFlow) -> Result<Convection, DomainError> {
        let channel = BareDuct::plate_convection(flow)?;
        let ratio = fin_area_ratio(
            &flow.geometry,
            self.spacing.get::<meter>(),
            self.thickness.get::<meter>(),
        );
        Ok(Convection {
            h: channel.h * ratio,
            ..channel
        })
    }

    fn pressure_drop(&self, flow: &DuctFlow, convection: &Convection) -> f64 {
        BareDuct::friction_pressure_drop(flow, convection.friction_factor)
    }
}

use uom::si::{
    f64::{Area, HeatTransfer, Length, ThermalConductivity},
    length::{centimeter, millimeter},
    thermal_conductivity::watt_per_meter_kelvin,
};

use crate::support::constraint::StrictlyPositive;

use super::super::ConfigError;

/// Streamwise discretization of the exchanger.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HxGeometry {
    pub length: Length,
    /// Plate width shared by every duct.
    pub width: Length,
    pub nodes: usize,
}

impl Default for HxGeometry {
    fn default() -> Self {
        Self {
            length: Length::new::<centimeter>(20.0),
            width: Length::new::<centimeter>(10.0),
            nodes: 25,
        }
    }
}

impl HxGeometry {
    /// Checks that the exchanger has a size and at least one node.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] on a non-positive dimension or zero nodes.
    pub fn validate(&self) -> Result<(), ConfigError> {
        StrictlyPositive::new(self.length).map_err(|e| e.named("hx.length"))?;
        StrictlyPositive::new(self.width).map_err(|e| e.named("hx.width"))?;
        if self.nodes == 0 {
            return Err(ConfigError::invalid("hx.nodes", "need at least one node"));
        }
        Ok(())
    }

    #[must_use]
    pub fn node_length(&self) -> Length {
        self.length / self.nodes as f64
    }

    /// Plate area through which one node passes heat.
    ///
    /// Every coolant duct faces one module-covered plate.
    #[must_use]
    pub fn node_area(&self, coolant_ducts: usize) -> Area {
        self.node_length() * self.width * coolant_ducts as f64
    }
}

/// Metal plate between a duct and the thermoelectric modules.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlateWall {
    pub conductivity: ThermalConductivity,
    pub thickness: Length,
}

impl Default for PlateWall {
    /// Aluminum, 5 mm thick.
    fn default() -> Self {
        Self {
            conductivity: ThermalConductivity::new::<watt_per_meter_kelvin>(200.0),
            thickness: Length::new::<millimeter>(5.0),
        }
    }
}

impl PlateWall {
    /// Conduction coefficient `k / t`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if conductivity or thickness is not strictly
    /// positive.
    pub fn h(&self) -> Result<HeatTransfer, ConfigError> {
        let k = StrictlyPositive::new(self.conductivity)
            .map_err(|e| e.named("wall.conductivity"))?
            .into_inner();
        let t = StrictlyPositive::new(self.thickness)
            .map_err(|e| e.named("wall.thickness"))?
            .into_inner();
        Ok(k / t)
    }
}

use uom::si::{
    f64::Length,
    length::{meter, millimeter},
};

use super::{
    super::FlowRegime, ConfigError, Convection, DomainError, Duct, DuctFlow, EnhancementModel,
    FlowGeometry, positive,
};

/// Metal mesh or foam filling the duct.
///
/// Interstitial heat transfer follows the Calmidi-Mahajan foam correlation on
/// the pore diameter and pore velocity, spread over the mesh surface area with
/// the mesh acting as an ideal fin. Pressure drop is Darcy-Forchheimer on
/// the superficial velocity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshPorous {
    /// Open volume fraction, in `(0, 1)`.
    pub porosity: f64,
    pub pore_diameter: Length,
    /// Darcy permeability in m².
    pub permeability: f64,
    /// Forchheimer inertial coefficient.
    pub inertial_coefficient: f64,
    /// Wetted mesh area per unit volume in 1/m.
    pub surface_area_density: f64,
}

impl Default for MeshPorous {
    fn default() -> Self {
        Self {
            porosity: 0.95,
            pore_diameter: Length::new::<millimeter>(2.5),
            permeability: 2.5e-7,
            inertial_coefficient: 0.1,
            surface_area_density: 1000.0,
        }
    }
}

impl MeshPorous {
    fn check(&self) -> Result<(), ConfigError> {
        if !(self.porosity > 0.0 && self.porosity < 1.0) {
            return Err(ConfigError::invalid(
                "mesh_porous.porosity",
                format!("{} is outside (0, 1)", self.porosity),
            ));
        }
        positive("mesh_porous.pore_diameter", self.pore_diameter)?;
        for (name, value) in [
            ("mesh_porous.permeability", self.permeability),
            ("mesh_porous.inertial_coefficient", self.inertial_coefficient),
            ("mesh_porous.surface_area_density", self.surface_area_density),
        ] {
            if !(value > 0.0 && value.is_finite()) {
                return Err(ConfigError::invalid(name, format!("{value} is not positive")));
            }
        }
        Ok(())
    }
}

impl EnhancementModel for MeshPorous {
    fn geometry(&self, duct: &Duct) -> Result<FlowGeometry, ConfigError> {
        self.check()?;
        duct.geometry()
    }

    fn convection(&self, flow: &DuctFlow) -> Result<Convection, DomainError> {
        let d_p = self.pore_diameter.get::<meter>();
        let fluid = flow.fluid;
        let pore_velocity = flow.velocity() / self.porosity;

        let reynolds = pore_velocity * d_p / fluid.kinematic_viscosity();
        if !(reynolds > 0.0 && reynolds.is_finite()) {
            return Err(DomainError::UndefinedFlow {
                context: "pore Reynolds number",
            });
        }

        let nusselt = 0.52 * reynolds.sqrt() * fluid.prandtl.powf(0.37);
        let h_interstitial = nusselt * fluid.conductivity / d_p;
        let sides = flow.geometry.sides.count() as f64;
        let plate_area_ratio = self.surface_area_density * flow.geometry.height / sides;

        Ok(Convection {
            reynolds,
            nusselt,
            friction_factor: self.inertial_coefficient,
            h: h_interstitial * plate_area_ratio,
            regime: FlowRegime::from_reynolds(reynolds),
        })
    }

    fn pressure_drop(&self, flow: &DuctFlow, _convection: &Convection) -> f64 {
        let velocity = flow.velocity();
        let fluid = flow.fluid;
        let gradient = fluid.viscosity * velocity / self.permeability
            + fluid.density * self.inertial_coefficient * velocity * velocity
                / self.permeability.sqrt();
        gradient * flow.node_length
    }
}

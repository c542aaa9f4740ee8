//! Heat transfer enhancements placed inside a duct.

mod ideal_fin;
mod jet_array;
mod mesh_porous;
mod offset_strip_fin;

use std::str::FromStr;

use uom::si::{f64::Length, length::meter};

use crate::support::constraint::StrictlyPositive;

use super::{
    super::{ConfigError, DomainError},
    Convection, Duct, DuctFlow, EnhancementModel, FlowGeometry,
};

pub use ideal_fin::IdealFin;
pub use jet_array::JetArray;
pub use mesh_porous::MeshPorous;
pub use offset_strip_fin::OffsetStripFin;

/// One of the supported enhancements.
///
/// Names parse with [`FromStr`] into the variant with its default geometry:
/// `"IdealFin"`, `"OffsetStripFin"`, `"JetArray"`, and `"MeshPorous"` (also
/// accepted as `"MancinPorous"`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Enhancement {
    IdealFin(IdealFin),
    OffsetStripFin(OffsetStripFin),
    JetArray(JetArray),
    MeshPorous(MeshPorous),
}

impl Enhancement {
    /// Characteristic spacing exposed to the optimizer, if the variant has one.
    #[must_use]
    pub fn spacing(&self) -> Option<Length> {
        match self {
            Self::IdealFin(fin) => Some(fin.spacing),
            Self::OffsetStripFin(fin) => Some(fin.spacing),
            Self::JetArray(jets) => Some(jets.pitch),
            Self::MeshPorous(_) => None,
        }
    }

    /// Returns a copy with a new characteristic spacing.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the variant has no spacing.
    pub fn with_spacing(self, spacing: Length) -> Result<Self, ConfigError> {
        Ok(match self {
            Self::IdealFin(fin) => Self::IdealFin(IdealFin { spacing, ..fin }),
            Self::OffsetStripFin(fin) => Self::OffsetStripFin(OffsetStripFin { spacing, ..fin }),
            Self::JetArray(jets) => Self::JetArray(JetArray {
                pitch: spacing,
                ..jets
            }),
            Self::MeshPorous(_) => {
                return Err(ConfigError::invalid(
                    "exh.enh.spacing",
                    "porous mesh has no spacing",
                ));
            }
        })
    }

    fn model(&self) -> &dyn EnhancementModel {
        match self {
            Self::IdealFin(fin) => fin,
            Self::OffsetStripFin(fin) => fin,
            Self::JetArray(jets) => jets,
            Self::MeshPorous(mesh) => mesh,
        }
    }
}

impl EnhancementModel for Enhancement {
    fn geometry(&self, duct: &Duct) -> Result<FlowGeometry, ConfigError> {
        self.model().geometry(duct)
    }

    fn convection(&self, flow: &DuctFlow) -> Result<Convection, DomainError> {
        self.model().convection(flow)
    }

    fn pressure_drop(&self, flow: &DuctFlow, convection: &Convection) -> f64 {
        self.model().pressure_drop(flow, convection)
    }
}

impl FromStr for Enhancement {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "IdealFin" => Ok(Self::IdealFin(IdealFin::default())),
            "OffsetStripFin" => Ok(Self::OffsetStripFin(OffsetStripFin::default())),
            "JetArray" => Ok(Self::JetArray(JetArray::default())),
            "MeshPorous" | "MancinPorous" => Ok(Self::MeshPorous(MeshPorous::default())),
            other => Err(ConfigError::UnknownEnhancement {
                name: other.to_string(),
            }),
        }
    }
}

/// Reads a strictly positive length in meters.
fn positive(name: &'static str, value: Length) -> Result<f64, ConfigError> {
    Ok(StrictlyPositive::new(value)
        .map_err(|e| e.named(name))?
        .into_inner()
        .get::<meter>())
}

/// Plate channels formed by fins spanning the duct height.
fn finned_channels(
    duct: &FlowGeometry,
    spacing: f64,
    thickness: f64,
) -> Result<FlowGeometry, ConfigError> {
    let pitch = spacing + thickness;
    if pitch > duct.width {
        return Err(ConfigError::invalid(
            "enhancement.spacing",
            format!("fin pitch {pitch} m exceeds duct width {} m", duct.width),
        ));
    }

    let channels = duct.width / pitch;
    let flow_area = channels * spacing * duct.height;
    let perimeter = channels * 2.0 * (spacing + duct.height);

    Ok(FlowGeometry {
        flow_area,
        perimeter,
        hydraulic_diameter: 4.0 * flow_area / perimeter,
        ..*duct
    })
}

/// Wetted area per unit heated plate area for ideal fins.
///
/// Each fin spans the duct, so with two heated plates it serves both.
fn fin_area_ratio(geometry: &FlowGeometry, spacing: f64, thickness: f64) -> f64 {
    let sides = geometry.sides.count() as f64;
    (spacing + 2.0 * geometry.height / sides) / (spacing + thickness)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_parse() {
        let parse = |name: &str| name.parse::<Enhancement>();

        assert!(matches!(parse("IdealFin"), Ok(Enhancement::IdealFin(_))));
        assert!(matches!(parse("OffsetStripFin"), Ok(Enhancement::OffsetStripFin(_))));
        assert!(matches!(parse("JetArray"), Ok(Enhancement::JetArray(_))));
        assert!(matches!(parse("MancinPorous"), Ok(Enhancement::MeshPorous(_))));
        assert!(matches!(
            parse("Dimples"),
            Err(ConfigError::UnknownEnhancement { .. })
        ));
    }

    #[test]
    fn spacing_is_replaced() {
        let fin: Enhancement = "IdealFin".parse().unwrap();
        let wider = fin.with_spacing(Length::new::<meter>(0.008)).unwrap();

        assert_eq!(wider.spacing(), Some(Length::new::<meter>(0.008)));
        assert!(
            "MeshPorous"
                .parse::<Enhancement>()
                .unwrap()
                .with_spacing(Length::new::<meter>(0.008))
                .is_err()
        );
    }
}

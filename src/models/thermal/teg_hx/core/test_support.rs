//! Shared fixtures for unit tests.

use uom::si::{
    area::square_millimeter,
    electric_current::ampere,
    f64::{Area, ElectricCurrent, Length, MassRate, Pressure, ThermodynamicTemperature},
    length::{centimeter, millimeter},
    mass_rate::kilogram_per_second,
    pressure::kilopascal,
    thermodynamic_temperature::kelvin,
};

use super::{
    Duct, FlowArrangement, FlowSide, FluidModel, HeatedSides, HxGeometry, Inlets, LegMethod,
    Material, PairGeometry, TegHx, ThermoelectricPair,
};

/// Air in one 1 cm by 10 cm duct heated on both sides.
pub(super) fn exhaust_side() -> FlowSide {
    FlowSide {
        duct: Duct {
            height: Length::new::<centimeter>(1.0),
            width: Length::new::<centimeter>(10.0),
            sides: HeatedSides::Two,
            count: 1,
        },
        mass_rate: MassRate::new::<kilogram_per_second>(0.02),
        fluid: FluidModel::Air {
            pressure: Pressure::new::<kilopascal>(101.325),
        },
        enhancement: None,
    }
}

/// Water split between two ducts heated on one side.
pub(super) fn coolant_side() -> FlowSide {
    FlowSide {
        duct: Duct {
            height: Length::new::<centimeter>(1.0),
            width: Length::new::<centimeter>(10.0),
            sides: HeatedSides::One,
            count: 2,
        },
        mass_rate: MassRate::new::<kilogram_per_second>(1.0),
        fluid: FluidModel::default(),
        enhancement: None,
    }
}

pub(super) fn pair_geometry() -> PairGeometry {
    PairGeometry {
        p_material: Material::Hms,
        n_material: Material::MgSi,
        p_area: Area::new::<square_millimeter>(9.0),
        leg_area_ratio: 0.71,
        fill_fraction: 0.02,
        length: Length::new::<millimeter>(1.0),
        nodes: 11,
    }
}

pub(super) fn pair(method: LegMethod) -> ThermoelectricPair {
    ThermoelectricPair::from_geometry(pair_geometry(), method)
        .expect("fixture geometry is valid")
}

/// Small exchanger that solves quickly with analytical legs.
pub(super) fn exchanger(arrangement: FlowArrangement) -> TegHx {
    TegHx {
        geometry: HxGeometry {
            nodes: 8,
            ..HxGeometry::default()
        },
        arrangement,
        current: ElectricCurrent::new::<ampere>(4.5),
        ..TegHx::new(exhaust_side(), coolant_side(), pair(LegMethod::Analytical))
    }
}

pub(super) fn inlets() -> Inlets {
    Inlets {
        exhaust: ThermodynamicTemperature::new::<kelvin>(800.0),
        coolant: ThermodynamicTemperature::new::<kelvin>(300.0),
    }
}

//! Model input orders.
//!
//! Each list is the exact column order the model and its scaler were fitted
//! on. Reordering an entry silently corrupts predictions.

use feature_engine::names::*;

pub const HVAC_FEATURES: [&str; 16] = [
    HVAC_LOAD_ESTIMATE,
    TEMP_OCCUPANCY_INTERACTION,
    INDOOR_TEMP_DEVIATION,
    TEMP_DEVIATION,
    TOTAL_OCCUPANCY,
    INDOOR_TEMP_C,
    OUTSIDE_TEMP_C,
    HOUR,
    IS_DAYTIME,
    OUTSIDE_HUMIDITY_PCT,
    INDOOR_HUMIDITY_PCT,
    PRESSURE_MMHG,
    INDOOR_HUMIDITY_DEVIATION,
    SEASON,
    HUMIDITY_DEVIATION,
    IS_WEEKEND,
];

pub const LIGHTING_FEATURES: [&str; 13] = [
    HOUR,
    IS_DAYTIME,
    TOTAL_OCCUPANCY,
    DAY_OF_WEEK,
    IS_WEEKEND,
    SEASON,
    OUTSIDE_TEMP_C,
    TEMP_DEVIATION,
    INDOOR_TEMP_C,
    BUILDING_AREA_M2,
    DAYLIGHT_HOURS_FACTOR,
    LIGHTING_OCCUPANCY_RATIO,
    SOLAR_IRRADIANCE,
];

pub const PLUG_FEATURES: [&str; 17] = [
    TOTAL_OCCUPANCY,
    HOUR,
    IS_DAYTIME,
    DAY_OF_WEEK,
    IS_WEEKEND,
    SEASON,
    BUILDING_AREA_M2,
    ENERGY_PRICE_USD_KWH,
    OUTSIDE_TEMP_C,
    INDOOR_TEMP_C,
    PLUG_PEAK_HOUR,
    DEVICE_USAGE_FACTOR,
    REMOTE_WORK_FACTOR,
    PRICE_SENSITIVITY,
    TEMP_DEVIATION,
    INDOOR_TEMP_DEVIATION,
    SOLAR_IRRADIANCE,
];

/// Width of the meta model input: three base predictions plus other load
pub const META_WIDTH: usize = 4;

//! Telemetry feature names as they appear in the building dataset.

// Primary environment and occupancy signals
pub const INDOOR_TEMP_C: &str = "Indoor_Temp_C";
pub const OUTSIDE_TEMP_C: &str = "OutsideWeather_Temp_C";
pub const OUTSIDE_HUMIDITY_PCT: &str = "OutsideWeather_Humidity_Pct";
pub const INDOOR_HUMIDITY_PCT: &str = "Indoor_Humidity_Pct";
pub const PRESSURE_MMHG: &str = "Pressure_mmHg";
pub const TOTAL_OCCUPANCY: &str = "Total_Occupancy_Count";

// Calendar
pub const HOUR: &str = "Hour";
pub const DAY_OF_WEEK: &str = "Day_of_Week";
pub const IS_WEEKEND: &str = "Is_Weekend";
pub const IS_DAYTIME: &str = "Is_Daytime";
pub const SEASON: &str = "Season";

// Building and load-shaping features
pub const HVAC_LOAD_ESTIMATE: &str = "HVAC_Load_Estimate";
pub const BUILDING_AREA_M2: &str = "Building_Area_m2";
pub const DAYLIGHT_HOURS_FACTOR: &str = "Daylight_Hours_Factor";
pub const LIGHTING_OCCUPANCY_RATIO: &str = "Lighting_Occupancy_Ratio";
pub const SOLAR_IRRADIANCE: &str = "Solar_Irradiance_Estimate";
pub const ENERGY_PRICE_USD_KWH: &str = "Energy_Price_USD_kWh";
pub const PLUG_PEAK_HOUR: &str = "Plug_Peak_Hour";
pub const DEVICE_USAGE_FACTOR: &str = "Device_Usage_Factor";
pub const REMOTE_WORK_FACTOR: &str = "Remote_Work_Factor";
pub const PRICE_SENSITIVITY: &str = "Price_Sensitivity";
pub const INDOOR_HUMIDITY_DEVIATION: &str = "Indoor_Humidity_Deviation";
pub const HUMIDITY_DEVIATION: &str = "Humidity_Deviation";

// Metered energy components (Wh)
pub const ENERGY_PLUG_WH: &str = "Energy_Plug_Wh";
pub const ENERGY_OTHER_WH: &str = "Energy_Other_Wh";

// Derived
pub const INDOOR_TEMP_DEVIATION: &str = "Indoor_Temp_Deviation";
pub const TEMP_DEVIATION: &str = "Temp_Deviation";
pub const TEMP_OCCUPANCY_INTERACTION: &str = "Temp_Occupancy_Interaction";

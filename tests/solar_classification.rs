mod common;

use approx::assert_abs_diff_eq;
use common::{synthetic_file, BASE_MJD};
use echogrid::pipeline::{EchogramPipeline, PipelineParams};
use echogrid::solar::{sun_cycle, SolarState, SunCycleConfig};
use echogrid::time::{hour_of_day, mjd_to_epoch};
use hifitime::Epoch;

#[test]
fn polar_summer_and_winter() {
    let config = SunCycleConfig::default();
    let june = Epoch::from_gregorian_utc_at_midnight(2015, 6, 21);
    let december = Epoch::from_gregorian_utc_at_midnight(2015, 12, 21);

    assert_eq!(sun_cycle(80.0, -45.0, &june, &config), (0.0, 24.0));
    assert_eq!(sun_cycle(80.0, -45.0, &december, &config), (24.0, 0.0));

    let state = SolarState::at(80.0, -45.0, &june, &config);
    assert!(state.is_daytime(0.01));
    assert!(state.is_daytime(23.99));
    let state = SolarState::at(80.0, -45.0, &december, &config);
    assert!(!state.is_daytime(12.0));
}

#[test]
fn day_length_at_equinox_is_twelve_hours() {
    let config = SunCycleConfig::default();
    let equinox = Epoch::from_gregorian_utc_at_midnight(2015, 3, 21);
    for lon in [-120.0, 0.0, 60.0] {
        let (rise, set) = sun_cycle(0.0, lon, &equinox, &config);
        let length = (set - rise).rem_euclid(24.0);
        assert_abs_diff_eq!(length, 12.0, epsilon = 0.1);
    }
}

#[test]
fn pipeline_flags_follow_local_time() {
    let pipeline = EchogramPipeline::new(PipelineParams::default()).unwrap();

    // 17h UTC at 70°W is local early afternoon, 05h UTC is local midnight
    let mut day_file = synthetic_file("day", 4, BASE_MJD + 17.0 / 24.0, 42.0, -70.0, 4);
    let mut night_file = synthetic_file("night", 4, BASE_MJD + 5.0 / 24.0, 42.0, -70.0, 4);

    let day = pipeline.process(&mut day_file).unwrap();
    let night = pipeline.process(&mut night_file).unwrap();

    assert!(day.day_night.iter().all(|&d| d));
    assert!(night.day_night.iter().all(|&d| !d));
    assert!(day.solar.iter().all(|s| s.radiation > 0.0 && s.altitude > 0.0));
    assert!(night.solar.iter().all(|s| s.radiation == 0.0));
}

#[test]
fn classification_matches_radiation_over_a_day() {
    // away from sunrise and sunset the flag agrees with the sign of the altitude
    let config = SunCycleConfig::default();
    for step in 0..48 {
        let mjd = BASE_MJD + step as f64 / 48.0;
        let state = SolarState::at(-33.0, 151.0, &mjd_to_epoch(mjd), &config);
        if state.altitude.abs() > 2.0 {
            assert_eq!(
                state.is_daytime(hour_of_day(mjd)),
                state.altitude > 0.0,
                "hour {}",
                hour_of_day(mjd)
            );
        }
    }
}

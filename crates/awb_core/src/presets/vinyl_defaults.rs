//! Stock vinyl effect presets.
//!
//! These ship with the application and are written into a fresh preset
//! document on first run. Users can overwrite or delete them; deleting
//! the whole document restores them on the next load.

use std::collections::BTreeMap;

use crate::models::VinylParams;

/// The built-in era presets for the vinyl effect module.
pub fn stock_vinyl_presets() -> BTreeMap<String, VinylParams> {
    let mut presets = BTreeMap::new();

    presets.insert(
        "Warm Vinyl".to_string(),
        VinylParams {
            highpass_freq: 400,
            lowpass_freq: 10_000,
            echo_gain: 0.5,
            echo_delay: 70,
            tremolo_freq: 6.0,
            tremolo_depth: 0.15,
            eq_low: -3.0,
            eq_high: 2.0,
            volume: 1.2,
        },
    );
    presets.insert(
        "Classic 50s".to_string(),
        VinylParams {
            highpass_freq: 300,
            lowpass_freq: 8_000,
            echo_gain: 1.2,
            echo_delay: 120,
            tremolo_freq: 8.0,
            tremolo_depth: 0.1,
            eq_low: -6.0,
            eq_high: 3.0,
            volume: 1.5,
        },
    );
    presets.insert(
        "1910s Gramophone".to_string(),
        VinylParams {
            highpass_freq: 800,
            lowpass_freq: 3_000,
            echo_gain: 0.8,
            echo_delay: 200,
            tremolo_freq: 4.0,
            tremolo_depth: 0.3,
            eq_low: -12.0,
            eq_high: -6.0,
            volume: 1.8,
        },
    );
    presets.insert(
        "1940s Radio".to_string(),
        VinylParams {
            highpass_freq: 200,
            lowpass_freq: 5_000,
            echo_gain: 0.4,
            echo_delay: 150,
            tremolo_freq: 5.0,
            tremolo_depth: 0.2,
            eq_low: -8.0,
            eq_high: -4.0,
            volume: 1.3,
        },
    );
    presets.insert(
        "70s Cassette".to_string(),
        VinylParams {
            highpass_freq: 100,
            lowpass_freq: 12_000,
            echo_gain: 0.3,
            echo_delay: 50,
            tremolo_freq: 0.3,
            tremolo_depth: 0.05,
            eq_low: -2.0,
            eq_high: -3.0,
            volume: 1.4,
        },
    );
    presets.insert(
        "Vintage Tape Loop".to_string(),
        VinylParams {
            highpass_freq: 150,
            lowpass_freq: 8_000,
            echo_gain: 0.7,
            echo_delay: 350,
            tremolo_freq: 0.5,
            tremolo_depth: 0.25,
            eq_low: -4.0,
            eq_high: -2.0,
            volume: 1.6,
        },
    );
    presets.insert(
        "80s VHS".to_string(),
        VinylParams {
            highpass_freq: 80,
            lowpass_freq: 10_000,
            echo_gain: 0.6,
            echo_delay: 30,
            tremolo_freq: 0.2,
            tremolo_depth: 0.4,
            eq_low: -6.0,
            eq_high: -8.0,
            volume: 1.7,
        },
    );

    presets
}

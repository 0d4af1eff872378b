//! Synthetic `station;temperature` input, used by the `data_generator`
//! binary, the benches and the integration tests.

use std::io::{self, Write};

use rand::{Rng, SeedableRng, rngs::StdRng};

/// (station, mean temperature)
pub const STATIONS: &[(&str, f64)] = &[
    ("Abha", 18.0),
    ("Accra", 26.4),
    ("Addis Ababa", 16.0),
    ("Alexandria", 20.0),
    ("Amsterdam", 10.2),
    ("Anchorage", 2.8),
    ("Athens", 19.2),
    ("Bangkok", 28.6),
    ("Barcelona", 18.2),
    ("Bulawayo", 18.9),
    ("Cairo", 21.4),
    ("Cracow", 9.3),
    ("Dakar", 24.0),
    ("Dodoma", 22.7),
    ("Hamburg", 9.7),
    ("Helsinki", 5.9),
    ("Istanbul", 13.9),
    ("Kyiv", 8.4),
    ("Lima", 19.6),
    ("Ljubljana", 10.9),
    ("Montréal", 6.8),
    ("Oslo", 5.7),
    ("Palembang", 27.3),
    ("Reykjavík", 4.3),
    ("São Paulo", 19.2),
    ("St. John's", 5.0),
    ("Tokyo", 15.4),
    ("Yakutsk", -8.8),
    ("Zürich", 9.3),
];

/// Writes `rows` newline-terminated records drawn from [`STATIONS`].
///
/// Temperatures carry one fractional digit and spread ±15 degrees around
/// each station's mean. The same `seed` always yields the same bytes.
pub fn write_measurements<W: Write>(writer: &mut W, rows: u64, seed: u64) -> io::Result<()> {
    let mut rng = StdRng::seed_from_u64(seed);
    for _ in 0..rows {
        let (name, mean) = STATIONS[rng.random_range(0..STATIONS.len())];
        let tenths = (mean * 10.0).round() as i64 + rng.random_range(-150..=150);
        writeln!(writer, "{name};{:.1}", tenths as f64 / 10.0)?;
    }
    Ok(())
}

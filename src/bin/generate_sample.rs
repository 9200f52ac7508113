use chrono::{Datelike, NaiveDate, Weekday};

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

fn season_for(date: NaiveDate) -> &'static str {
    match date.month() {
        3..=5 => "Spring",
        6..=8 => "Summer",
        9..=11 => "Fall",
        _ => "Winter",
    }
}

fn weather_for(rng: &mut SimpleRng) -> (&'static str, f64) {
    let roll = rng.next_f64();
    if roll < 0.65 {
        ("Clear", 1.0)
    } else if roll < 0.90 {
        ("Mist", 0.8)
    } else {
        ("Light Rain", 0.55)
    }
}

/// Share of the day's rentals falling in each hour: low overnight, commute
/// peaks around 8:00 and 17:00-18:00.
const HOURLY_PROFILE: [f64; 24] = [
    0.010, 0.006, 0.004, 0.003, 0.004, 0.012, 0.035, 0.070, 0.095, 0.055, 0.040, 0.045, //
    0.050, 0.048, 0.045, 0.050, 0.070, 0.100, 0.090, 0.060, 0.040, 0.030, 0.022, 0.016,
];

fn main() {
    let mut rng = SimpleRng::new(42);

    let start = NaiveDate::from_ymd_opt(2011, 1, 1).expect("valid date");
    let end = NaiveDate::from_ymd_opt(2012, 12, 31).expect("valid date");

    std::fs::create_dir_all("data").expect("creating data directory");
    let output_path = "data/bike_df.csv";
    let mut writer = csv::Writer::from_path(output_path).expect("creating output file");
    writer
        .write_record([
            "dteday",
            "hr",
            "workingday_daily",
            "cnt_daily",
            "cnt_hourly",
            "season_daily",
            "weathersit_daily",
        ])
        .expect("writing header");

    let mut rows: u64 = 0;
    for date in start.iter_days().take_while(|d| *d <= end) {
        let season = season_for(date);
        let (weather, weather_factor) = weather_for(&mut rng);
        let workingday = match date.weekday() {
            Weekday::Sat | Weekday::Sun => "Holiday",
            _ => "Working Day",
        };

        let season_base: f64 = match season {
            "Spring" => 4500.0,
            "Summer" => 5600.0,
            "Fall" => 5000.0,
            _ => 2500.0,
        };
        let day_factor = if workingday == "Working Day" { 1.05 } else { 0.9 };
        let cnt_daily = (season_base * weather_factor * day_factor
            + rng.gauss(0.0, 250.0))
        .max(0.0)
        .round();

        for (hr, share) in HOURLY_PROFILE.iter().enumerate() {
            let cnt_hourly = (cnt_daily * share * (1.0 + rng.gauss(0.0, 0.1)))
                .max(0.0)
                .round();
            writer
                .write_record([
                    date.format("%Y-%m-%d").to_string(),
                    hr.to_string(),
                    workingday.to_string(),
                    format!("{cnt_daily:.0}"),
                    format!("{cnt_hourly:.0}"),
                    season.to_string(),
                    weather.to_string(),
                ])
                .expect("writing row");
            rows += 1;
        }
    }

    writer.flush().expect("flushing output");
    println!("Wrote {rows} rows to {output_path}");
}

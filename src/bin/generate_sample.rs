use chrono::{Duration, NaiveDate};

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

    fn range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + self.next_f64() * (hi - lo)
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

fn main() {
    let mut rng = SimpleRng::new(42);

    let start = NaiveDate::from_ymd_opt(2021, 1, 1).expect("valid start date");
    let test_groups = ["Control", "Variant"];
    let marital_statuses = ["Single", "Married", "Divorced", "Widowed"];

    let output_path = "sample_quotes.csv";
    let mut writer = csv::Writer::from_path(output_path).expect("Failed to create output file");

    writer
        .write_record([
            "Quote Number",
            "Transaction Date",
            "Test Group",
            "Sale Indicator",
            "Net Price",
            "Profit",
            "Tax",
            "Total Price",
            "Customer Age",
            "Licence Length",
            "Marital Status",
            "Credit Score",
            "Vehicle Mileage",
            "Vehicle Value",
        ])
        .expect("Failed to write header");

    let mut quote_number: i64 = 100_000;
    for day in 0..90 {
        let date = start + Duration::days(day);
        let quotes_today = 3 + (rng.next_u64() % 5) as usize;

        for _ in 0..quotes_today {
            let group = test_groups[(rng.next_u64() % 2) as usize];
            let age = rng.range(18.0, 80.0).round();
            let licence = (age - 17.0).min(rng.range(0.3, 30.0)).max(0.3);
            let vehicle_value = rng.gauss(9_000.0, 3_000.0).max(500.0).round();
            let mileage = rng.gauss(45_000.0, 20_000.0).max(1_000.0).round();
            let credit = rng.range(300.0, 850.0).round();

            // Variant cohort carries a small price uplift.
            let uplift = if group == "Variant" { 1.05 } else { 1.0 };
            let net = (vehicle_value * 0.045 + rng.gauss(80.0, 15.0)) * uplift;
            let profit = net * rng.range(0.10, 0.30);
            let tax = net * 0.12;
            let total = net + tax;
            let sold = u64::from(rng.next_f64() < 0.35);

            writer
                .write_record([
                    quote_number.to_string(),
                    date.to_string(),
                    group.to_string(),
                    sold.to_string(),
                    format!("{net:.2}"),
                    format!("{profit:.2}"),
                    format!("{tax:.2}"),
                    format!("{total:.2}"),
                    format!("{age}"),
                    format!("{licence:.1}"),
                    marital_statuses[(rng.next_u64() % 4) as usize].to_string(),
                    format!("{credit}"),
                    format!("{mileage}"),
                    format!("{vehicle_value}"),
                ])
                .expect("Failed to write row");

            quote_number += 1;
        }
    }

    writer.flush().expect("Failed to flush writer");
    println!("Wrote {} quotes to {output_path}", quote_number - 100_000);
}

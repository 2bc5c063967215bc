use serde::Serialize;

/// One spreadsheet row, serialized under the dashboard's column names.
#[derive(Serialize)]
struct SampleRow {
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Shipper Declared")]
    shipper: String,
    #[serde(rename = "International Competitor")]
    international: String,
    #[serde(rename = "Domestic Competitor")]
    domestic: String,
    #[serde(rename = "HS Code")]
    hs_code: String,
    #[serde(rename = "Country of Origin")]
    country: String,
    #[serde(rename = "Category")]
    category: String,
    #[serde(rename = "Metric Tons")]
    metric_tons: String,
    #[serde(rename = "Total calculated value ($)")]
    total_value: String,
    #[serde(rename = "Val/KG ($)")]
    value_per_kg: String,
}

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

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[(self.next_u64() % items.len() as u64) as usize]
    }

    fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }
}

fn main() {
    let output_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "PRY_Dash.csv".to_string());
    let mut rng = SimpleRng::new(42);

    let shippers = [
        "Nexans Chile SA",
        "Sterlite Technologies Limited",
        "LS Cable & System Ltd",
        "Furukawa Electric Co., Ltd.",
        "Southwire Company LLC",
        "Aurubis AG",
    ];
    let international = ["Nexans", "LS Cable & System", "Furukawa Electric", "Aurubis AG", ""];
    let domestic = ["Southwire", "Encore Wire Inc", "Cerro Wire LLC", ""];
    // Two codes outside the allow-list exercise the loader's scoping.
    let hs_codes = ["854442", "854449", "854460", "740311", "854420", "740819"];
    let countries = ["Chile", "India", "South Korea", "Japan", "Germany", "Mexico", "Peru"];
    let categories = ["Power Cable", "Building Wire", "Copper Cathode", "Fiber Optic", "Control Cable", "Other"];

    let mut writer = csv::Writer::from_path(&output_path).expect("Failed to create output file");
    let n_rows = 600;

    for i in 0..n_rows {
        let month = 1 + (i % 12) as u32;
        let day = 1 + (rng.next_u64() % 28) as u32;
        let year = if i % 24 < 12 { 2023 } else { 2024 };
        let date = if rng.chance(0.02) {
            "not a date".to_string()
        } else {
            format!("{month:02}/{day:02}/{year}")
        };

        let tons = 0.5 + rng.next_f64() * 120.0;
        let per_kg = 3.0 + rng.next_f64() * 9.0;
        let metric_tons = if rng.chance(0.03) {
            "n/a".to_string()
        } else {
            format!("{tons:.3}")
        };
        let value_per_kg = if rng.chance(0.05) {
            String::new()
        } else {
            format!("{per_kg:.2}")
        };

        let row = SampleRow {
            date,
            shipper: rng.pick(&shippers).to_string(),
            international: rng.pick(&international).to_string(),
            domestic: rng.pick(&domestic).to_string(),
            hs_code: rng.pick(&hs_codes).to_string(),
            country: rng.pick(&countries).to_string(),
            category: rng.pick(&categories).to_string(),
            metric_tons,
            total_value: format!("{:.2}", tons * 1000.0 * per_kg),
            value_per_kg,
        };
        writer.serialize(row).expect("Failed to write row");
    }
    writer.flush().expect("Failed to flush output");

    println!("Wrote {n_rows} sample transactions to {output_path}");
}

use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

/// Write a deterministic synthetic campaign CSV.
#[derive(Debug, Parser)]
#[command(name = "generate_sample")]
struct Args {
    /// Destination CSV.
    #[arg(long, short, default_value = "influencer_campaigns.csv")]
    output: PathBuf,

    /// Campaign rows to generate.
    #[arg(long, default_value_t = 60)]
    rows: usize,

    /// RNG seed; the same seed and row count give the same file.
    #[arg(long, default_value_t = 42)]
    seed: u64,
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

    fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[(self.next_u64() % items.len() as u64) as usize]
    }
}

/// (platform, base engagement rate, sales per click)
const PLATFORMS: [(&str, f64, f64); 4] = [
    ("Instagram", 0.045, 3.2),
    ("TikTok", 0.070, 2.4),
    ("YouTube", 0.035, 4.1),
    ("Snapchat", 0.030, 2.0),
];

/// (content type, conversion multiplier)
const CONTENT_TYPES: [(&str, f64); 4] = [
    ("Reel", 1.25),
    ("Story", 0.85),
    ("Post", 1.0),
    ("Video", 1.15),
];

const FIRST_NAMES: [&str; 12] = [
    "Aisha", "Omar", "Layla", "Yousef", "Mariam", "Khalid", "Noor", "Sara", "Hamdan", "Fatima",
    "Zayed", "Reem",
];

const HEADER: [&str; 9] = [
    "platform",
    "content_type",
    "influencer_name",
    "followers",
    "engagement_rate",
    "clicks",
    "impressions",
    "ad_spend",
    "monthly_sales",
];

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let file = std::fs::File::create(&args.output)
        .with_context(|| format!("creating {}", args.output.display()))?;
    write_campaigns(file, args.rows, args.seed)?;

    log::info!("Wrote {} campaigns to {}", args.rows, args.output.display());
    println!("Wrote {} campaigns to {}", args.rows, args.output.display());
    Ok(())
}

fn write_campaigns<W: io::Write>(out: W, rows: usize, seed: u64) -> Result<()> {
    let mut rng = SimpleRng::new(seed);

    // A fixed roster so influencers recur across campaigns.
    let roster: Vec<String> = (0..40)
        .map(|i| format!("{}_{}", FIRST_NAMES[i % FIRST_NAMES.len()], 100 + i))
        .collect();

    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(HEADER)?;

    for _ in 0..rows {
        let &(platform, base_engagement, sales_per_click) = rng.pick(&PLATFORMS);
        let &(content_type, multiplier) = rng.pick(&CONTENT_TYPES);
        let name = rng.pick(&roster).clone();

        let followers = (10f64.powf(rng.uniform(3.5, 6.3))).round() as u64;
        let engagement_rate = (base_engagement * multiplier + rng.gauss(0.0, 0.01)).clamp(0.002, 0.25);
        let impressions = (followers as f64 * rng.uniform(0.3, 1.8)).round() as u64;
        let clicks = (impressions as f64 * engagement_rate * rng.uniform(0.2, 0.6)).round() as u64;
        let ad_spend = (followers as f64 * rng.uniform(0.002, 0.012)).max(50.0);
        let monthly_sales =
            (clicks as f64 * sales_per_click * multiplier + ad_spend * 0.8 + rng.gauss(0.0, 400.0)).max(0.0);

        writer.write_record([
            platform.to_string(),
            content_type.to_string(),
            name,
            followers.to_string(),
            format!("{engagement_rate:.4}"),
            clicks.to_string(),
            impressions.to_string(),
            format!("{ad_spend:.2}"),
            format!("{monthly_sales:.2}"),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

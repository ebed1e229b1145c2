use std::path::PathBuf;

use clap::Parser;

use crate::data::summary::SummarySettings;

/// Command line / environment configuration for the dashboard.
#[derive(Debug, Clone, Parser)]
#[command(name = "influencer-dashboard")]
#[command(about = "Interactive dashboard for influencer marketing campaigns")]
pub struct DashboardConfig {
    /// Campaign CSV loaded at startup.
    #[arg(long, env = "INFLUENCER_DATA", default_value = "influencer_campaigns.csv")]
    pub data: PathBuf,

    /// Number of influencers shown in the top-sales chart.
    #[arg(
        long,
        env = "INFLUENCER_TOP_N",
        default_value_t = 10,
        value_parser = clap::value_parser!(u16).range(1..)
    )]
    pub top_n: u16,

    /// Bins in the monthly-sales histogram.
    #[arg(
        long,
        env = "INFLUENCER_HISTOGRAM_BINS",
        default_value_t = 30,
        value_parser = clap::value_parser!(u16).range(1..)
    )]
    pub histogram_bins: u16,

    /// Directory the export dialog opens in.
    #[arg(long, env = "INFLUENCER_EXPORT_DIR")]
    pub export_dir: Option<PathBuf>,
}

impl DashboardConfig {
    pub fn summary_settings(&self) -> SummarySettings {
        SummarySettings {
            top_n: usize::from(self.top_n),
            histogram_bins: usize::from(self.histogram_bins),
        }
    }

    /// Where exports start out: the configured directory, else the
    /// directory holding the data file.
    pub fn export_dir(&self) -> PathBuf {
        self.export_dir.clone().unwrap_or_else(|| {
            self.data
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("."))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_original_dashboard() {
        let config = DashboardConfig::try_parse_from(["influencer-dashboard"]).expect("defaults parse");
        assert_eq!(config.data, PathBuf::from("influencer_campaigns.csv"));
        assert_eq!(config.summary_settings(), SummarySettings::default());
        assert_eq!(config.export_dir(), PathBuf::from("."));
    }

    #[test]
    fn flags_override_defaults() {
        let config = DashboardConfig::try_parse_from([
            "influencer-dashboard",
            "--data",
            "data/q3.csv",
            "--top-n",
            "5",
            "--histogram-bins",
            "12",
        ])
        .expect("flags parse");
        assert_eq!(config.summary_settings().top_n, 5);
        assert_eq!(config.summary_settings().histogram_bins, 12);
        assert_eq!(config.export_dir(), PathBuf::from("data"));
    }

    #[test]
    fn zero_top_n_is_rejected() {
        assert!(DashboardConfig::try_parse_from(["influencer-dashboard", "--top-n", "0"]).is_err());
    }
}

use eframe::egui::{self, RichText, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};

use super::charts::{self, Scatter};
use super::format;
use super::panels::save_file_dialog;
use crate::data::model::{CategoryColumn, NumericColumn};
use crate::state::{AppState, Tab};

/// Render whichever tab is active in the central panel.
pub fn central_panel(ui: &mut Ui, state: &mut AppState) {
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| match state.active_tab {
            Tab::Overview => overview(ui, state),
            Tab::StrategyInsights => strategy_insights(ui, state),
            Tab::EngagementMetrics => engagement_metrics(ui, state),
            Tab::DataTable => data_table(ui, state),
        });
}

fn section(ui: &mut Ui, title: &str) {
    ui.add_space(10.0);
    ui.strong(format!("📌 {title}"));
}

// ---------------------------------------------------------------------------
// Overview
// ---------------------------------------------------------------------------

fn overview(ui: &mut Ui, state: &AppState) {
    ui.heading("Overview of Campaign Performance");

    section(ui, "Total Monthly Sales across all selected filters");
    ui.label("Total Sales (AED)");
    ui.label(RichText::new(format::currency(state.summary.total_sales)).size(32.0).strong());

    if state.filtered.is_empty() {
        charts::empty_notice(ui);
        return;
    }

    section(ui, "Average Engagement Rate per Platform");
    let engagement: Vec<(String, f64)> = state
        .summary
        .engagement_by_platform
        .iter()
        .map(|(k, v)| (k.clone(), *v))
        .collect();
    charts::category_bars(
        ui,
        "engagement_by_platform",
        NumericColumn::EngagementRate.name(),
        &engagement,
        Some(&state.platform_colors),
    );

    section(ui, "Distribution of Monthly Sales");
    charts::histogram(
        ui,
        "sales_histogram",
        NumericColumn::MonthlySales.name(),
        &state.summary.sales_histogram,
    );
}

// ---------------------------------------------------------------------------
// Strategy insights
// ---------------------------------------------------------------------------

fn strategy_insights(ui: &mut Ui, state: &AppState) {
    ui.heading("Influencer Strategy Insights");
    if state.filtered.is_empty() {
        charts::empty_notice(ui);
        return;
    }

    section(ui, &format!("Top {} Influencers by Sales", state.settings.top_n));
    charts::category_bars(
        ui,
        "top_influencers",
        NumericColumn::MonthlySales.name(),
        &state.summary.top_influencers,
        None,
    );

    section(ui, "Sales by Content Type");
    charts::box_plot(
        ui,
        "sales_by_content_type",
        NumericColumn::MonthlySales.name(),
        &state.summary.sales_by_content_type,
        &state.content_type_colors,
    );

    section(ui, "Sales by Platform");
    charts::violin_plot(
        ui,
        "sales_by_platform",
        NumericColumn::MonthlySales.name(),
        &state.summary.sales_by_platform,
        &state.summary.sales_density_by_platform,
        &state.platform_colors,
    );
}

// ---------------------------------------------------------------------------
// Engagement metrics
// ---------------------------------------------------------------------------

fn engagement_metrics(ui: &mut Ui, state: &AppState) {
    ui.heading("Engagement and Conversion Metrics");
    if state.filtered.is_empty() {
        charts::empty_notice(ui);
        return;
    }

    section(ui, "Correlation Heatmap");
    charts::correlation_heatmap(ui, &state.summary.correlation);

    let platform = Some((CategoryColumn::Platform, &state.platform_colors));
    let content_type = Some((CategoryColumn::ContentType, &state.content_type_colors));
    let plots = [
        (
            "Clicks vs Sales",
            Scatter {
                id: "clicks_vs_sales",
                x: NumericColumn::Clicks,
                y: NumericColumn::MonthlySales,
                color_by: None,
                size_by_followers: false,
                trendline: true,
            },
        ),
        (
            "Ad Spend vs Sales",
            Scatter {
                id: "ad_spend_vs_sales",
                x: NumericColumn::AdSpend,
                y: NumericColumn::MonthlySales,
                color_by: platform,
                size_by_followers: false,
                trendline: true,
            },
        ),
        (
            "Impressions vs Clicks",
            Scatter {
                id: "impressions_vs_clicks",
                x: NumericColumn::Impressions,
                y: NumericColumn::Clicks,
                color_by: content_type,
                size_by_followers: false,
                trendline: true,
            },
        ),
        (
            "Engagement Rate vs Monthly Sales",
            Scatter {
                id: "engagement_vs_sales",
                x: NumericColumn::EngagementRate,
                y: NumericColumn::MonthlySales,
                color_by: platform,
                size_by_followers: true,
                trendline: false,
            },
        ),
    ];

    for (title, scatter) in &plots {
        section(ui, title);
        scatter.show(ui, &state.filtered);
    }
}

// ---------------------------------------------------------------------------
// Data table & summary
// ---------------------------------------------------------------------------

fn data_table(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Data Table & Key Summary");

    section(ui, "Filtered Dataset Table");
    ui.push_id("filtered_rows", |ui: &mut Ui| {
        let records = &state.filtered.records;
        TableBuilder::new(ui)
            .striped(true)
            .max_scroll_height(320.0)
            .columns(Column::auto().resizable(true), 9)
            .header(20.0, |mut header| {
                for name in crate::data::loader::REQUIRED_COLUMNS {
                    header.col(|ui: &mut Ui| {
                        ui.strong(name);
                    });
                }
            })
            .body(|body| {
                body.rows(18.0, records.len(), |mut row| {
                    let rec = &records[row.index()];
                    let cells = [
                        rec.platform.clone(),
                        rec.content_type.clone(),
                        rec.influencer_name.clone(),
                        rec.followers.to_string(),
                        format!("{:.4}", rec.engagement_rate),
                        rec.clicks.to_string(),
                        rec.impressions.to_string(),
                        format!("{:.2}", rec.ad_spend),
                        format!("{:.2}", rec.monthly_sales),
                    ];
                    for cell in cells {
                        row.col(|ui: &mut Ui| {
                            ui.label(cell);
                        });
                    }
                });
            });
    });

    section(ui, "Summary Statistics");
    egui::Grid::new("describe")
        .striped(true)
        .show(ui, |ui: &mut Ui| {
            ui.strong("");
            for s in &state.summary.describe {
                ui.strong(s.column.name());
            }
            ui.end_row();

            type Stat = fn(&crate::data::stats::ColumnSummary) -> f64;
            let rows: [(&str, Stat); 8] = [
                ("mean", |s| s.mean),
                ("std", |s| s.std),
                ("min", |s| s.min),
                ("25%", |s| s.p25),
                ("50%", |s| s.median),
                ("75%", |s| s.p75),
                ("max", |s| s.max),
                ("count", |s| s.count as f64),
            ];
            for (label, stat) in rows {
                ui.label(label);
                for s in &state.summary.describe {
                    ui.label(format::stat(stat(s)));
                }
                ui.end_row();
            }
        });

    ui.add_space(10.0);
    ui.horizontal(|ui: &mut Ui| {
        if ui.button("Download Filtered Data").clicked() {
            save_file_dialog(state);
        }
        if ui.button("Copy summary as JSON").clicked() {
            match state.summary.to_json() {
                Ok(json) => {
                    ui.ctx().copy_text(json);
                    state.status_message = Some("Summary copied to clipboard".to_string());
                }
                Err(e) => {
                    log::error!("Serialising summary failed: {e}");
                    state.status_message = Some(format!("Error: serialising summary: {e}"));
                }
            }
        }
    });
}

use std::ops::RangeInclusive;

use eframe::egui::{self, pos2, vec2, Align2, Color32, FontId, Rect, Sense, Stroke, Ui};
use egui_plot::{
    Bar, BarChart, BoxElem, BoxPlot, GridMark, Legend, Line, Plot, PlotPoints, PlotUi, Points, Polygon,
};

use crate::color::{coolwarm, contrasting_text, CategoryColors};
use crate::data::aggregate::CorrelationMatrix;
use crate::data::model::{CampaignTable, CategoryColumn, NumericColumn};
use crate::data::stats::{linear_fit, GroupDensity, GroupSpread, Histogram};

const PLOT_HEIGHT: f32 = 280.0;

/// Axis formatter that prints `labels[i]` at integer position `i`.
fn category_axis(labels: Vec<String>) -> impl Fn(GridMark, &RangeInclusive<f64>) -> String {
    move |mark: GridMark, _range: &RangeInclusive<f64>| {
        let idx = mark.value.round();
        if (mark.value - idx).abs() > 1e-6 || idx < 0.0 {
            return String::new();
        }
        labels.get(idx as usize).cloned().unwrap_or_default()
    }
}

// ---------------------------------------------------------------------------
// Bar charts
// ---------------------------------------------------------------------------

/// One bar per `(label, value)`, coloured via `colors` when given.
pub fn category_bars(
    ui: &mut Ui,
    id: &str,
    y_label: &str,
    entries: &[(String, f64)],
    colors: Option<&CategoryColors>,
) {
    let bars: Vec<Bar> = entries
        .iter()
        .enumerate()
        .map(|(i, (label, value))| {
            let fill = colors.map_or(Color32::LIGHT_BLUE, |c| c.color_for(label));
            Bar::new(i as f64, *value).name(label).fill(fill).width(0.7)
        })
        .collect();
    let labels: Vec<String> = entries.iter().map(|(l, _)| l.clone()).collect();

    Plot::new(id)
        .height(PLOT_HEIGHT)
        .y_axis_label(y_label)
        .x_axis_formatter(category_axis(labels))
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).name(y_label));
        });
}

/// Histogram drawn as touching bars.
pub fn histogram(ui: &mut Ui, id: &str, x_label: &str, hist: &Histogram) {
    let bars: Vec<Bar> = hist
        .counts
        .iter()
        .enumerate()
        .map(|(i, &count)| Bar::new(hist.bin_center(i), count as f64).width(hist.bin_width))
        .collect();

    Plot::new(id)
        .height(PLOT_HEIGHT)
        .x_axis_label(x_label)
        .y_axis_label("count")
        .legend(Legend::default())
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(
                BarChart::new(bars)
                    .color(Color32::from_rgb(99, 110, 250))
                    .name(format!("{} campaigns", hist.total())),
            );
        });
}

// ---------------------------------------------------------------------------
// Box plots
// ---------------------------------------------------------------------------

/// One box per group, coloured by category.
pub fn box_plot(
    ui: &mut Ui,
    id: &str,
    y_label: &str,
    groups: &[GroupSpread],
    colors: &CategoryColors,
) {
    category_plot(id, y_label, groups).show(ui, |plot_ui| {
        for (i, g) in groups.iter().enumerate() {
            let color = colors.color_for(&g.group);
            draw_box(plot_ui, i as f64, g, color, 0.5);
        }
    });
}

/// Mirrored density outline per group with a narrow box inside.
///
/// Groups with no density (a single value, or no spread) get the box alone.
pub fn violin_plot(
    ui: &mut Ui,
    id: &str,
    y_label: &str,
    groups: &[GroupSpread],
    densities: &[GroupDensity],
    colors: &CategoryColors,
) {
    const HALF_WIDTH: f64 = 0.4;

    category_plot(id, y_label, groups).show(ui, |plot_ui| {
        for (i, g) in groups.iter().enumerate() {
            let x = i as f64;
            let color = colors.color_for(&g.group);

            if let Some(d) = densities.iter().find(|d| d.group == g.group) {
                let peak = d.density.peak();
                if peak > 0.0 {
                    let pairs = d.density.grid.iter().zip(&d.density.values);
                    let right = pairs.clone().map(|(&y, &v)| [x + HALF_WIDTH * v / peak, y]);
                    let left = pairs.rev().map(|(&y, &v)| [x - HALF_WIDTH * v / peak, y]);
                    let outline: PlotPoints = right.chain(left).collect();
                    plot_ui.polygon(
                        Polygon::new(outline)
                            .fill_color(color.gamma_multiply(0.25))
                            .stroke(Stroke::new(1.5, color))
                            .name(&g.group),
                    );
                }
            }
            draw_box(plot_ui, x, g, color, 0.12);
        }
    });
}

fn category_plot(id: &str, y_label: &str, groups: &[GroupSpread]) -> Plot<'static> {
    Plot::new(id)
        .height(PLOT_HEIGHT)
        .y_axis_label(y_label)
        .legend(Legend::default())
        .x_axis_formatter(category_axis(groups.iter().map(|g| g.group.clone()).collect()))
        .allow_scroll(false)
}

fn draw_box(plot_ui: &mut PlotUi, x: f64, g: &GroupSpread, color: Color32, width: f64) {
    let s = &g.spread;
    let elem = BoxElem::new(
        x,
        egui_plot::BoxSpread::new(s.lower_whisker, s.q1, s.median, s.q3, s.upper_whisker),
    )
    .name(&g.group)
    .fill(color.gamma_multiply(0.4))
    .stroke(Stroke::new(1.5, color))
    .box_width(width)
    .whisker_width(width);
    plot_ui.box_plot(BoxPlot::new(vec![elem]).name(&g.group));

    if !s.outliers.is_empty() {
        let pts: PlotPoints = s.outliers.iter().map(|&v| [x, v]).collect();
        plot_ui.points(Points::new(pts).color(color).radius(2.5).name(&g.group));
    }
}

// ---------------------------------------------------------------------------
// Correlation heatmap
// ---------------------------------------------------------------------------

/// Annotated grid of correlation coefficients on a diverging scale.
pub fn correlation_heatmap(ui: &mut Ui, corr: &CorrelationMatrix) {
    let k = corr.len();
    if k == 0 {
        return;
    }
    let label_w = 110.0;
    let header_h = 22.0;
    let cell = ((ui.available_width() - label_w) / k as f32).clamp(48.0, 96.0);

    let size = vec2(label_w + cell * k as f32, header_h + cell * k as f32);
    let (response, painter) = ui.allocate_painter(size, Sense::hover());
    let origin = response.rect.min;
    let font = FontId::proportional(11.0);
    let text_color = ui.visuals().text_color();

    for (j, column) in corr.columns.iter().enumerate() {
        painter.text(
            origin + vec2(label_w + cell * (j as f32 + 0.5), header_h * 0.5),
            Align2::CENTER_CENTER,
            column.name(),
            font.clone(),
            text_color,
        );
    }

    for (i, column) in corr.columns.iter().enumerate() {
        let top = origin.y + header_h + cell * i as f32;
        painter.text(
            pos2(origin.x + label_w - 6.0, top + cell * 0.5),
            Align2::RIGHT_CENTER,
            column.name(),
            font.clone(),
            text_color,
        );

        for j in 0..k {
            let value = corr.get(i, j);
            let rect = Rect::from_min_size(
                pos2(origin.x + label_w + cell * j as f32, top),
                vec2(cell, cell),
            )
            .shrink(1.0);
            let fill = coolwarm(value);
            painter.rect_filled(rect, 2.0, fill);

            let label = if value.is_nan() {
                "NaN".to_string()
            } else {
                format!("{value:.2}")
            };
            painter.text(rect.center(), Align2::CENTER_CENTER, label, font.clone(), contrasting_text(fill));
        }
    }

    response.on_hover_text("Pearson correlation; NaN where a column is constant");
}

// ---------------------------------------------------------------------------
// Scatter plots
// ---------------------------------------------------------------------------

/// What to draw in one scatter plot.
pub struct Scatter<'a> {
    pub id: &'a str,
    pub x: NumericColumn,
    pub y: NumericColumn,
    /// Colour (and fit trend lines) per category.
    pub color_by: Option<(CategoryColumn, &'a CategoryColors)>,
    /// Scale marker radius with follower count.
    pub size_by_followers: bool,
    pub trendline: bool,
}

impl Scatter<'_> {
    pub fn show(&self, ui: &mut Ui, table: &CampaignTable) {
        // Split into series: one per category, or a single unnamed one.
        let mut series: Vec<(String, Color32, Vec<[f64; 2]>, Vec<f64>)> = Vec::new();
        for rec in table {
            let (name, color) = match self.color_by {
                Some((column, colors)) => {
                    let name = column.value(rec);
                    (name, colors.color_for(name))
                }
                None => ("campaigns", Color32::from_rgb(99, 110, 250)),
            };
            let point = [self.x.value(rec), self.y.value(rec)];
            let followers = rec.followers as f64;
            match series.iter_mut().find(|(n, ..)| n == name) {
                Some((_, _, pts, sizes)) => {
                    pts.push(point);
                    sizes.push(followers);
                }
                None => series.push((name.to_string(), color, vec![point], vec![followers])),
            }
        }
        let max_followers = table
            .iter()
            .map(|r| r.followers as f64)
            .fold(0.0, f64::max)
            .max(1.0);

        Plot::new(self.id)
            .height(PLOT_HEIGHT)
            .x_axis_label(self.x.name())
            .y_axis_label(self.y.name())
            .legend(Legend::default())
            .allow_scroll(false)
            .show(ui, |plot_ui| {
                for (name, color, pts, sizes) in &series {
                    if self.size_by_followers {
                        for (p, followers) in pts.iter().zip(sizes) {
                            let radius = 2.0 + 8.0 * (followers / max_followers).sqrt() as f32;
                            plot_ui.points(Points::new(vec![*p]).radius(radius).color(*color).name(name));
                        }
                    } else {
                        plot_ui.points(Points::new(pts.clone()).radius(2.5).color(*color).name(name));
                    }

                    if self.trendline {
                        let xs: Vec<f64> = pts.iter().map(|p| p[0]).collect();
                        let ys: Vec<f64> = pts.iter().map(|p| p[1]).collect();
                        if let Some(fit) = linear_fit(&xs, &ys) {
                            let lo = xs.iter().copied().fold(f64::INFINITY, f64::min);
                            let hi = xs.iter().copied().fold(f64::NEG_INFINITY, f64::max);
                            let line = Line::new(vec![[lo, fit.predict(lo)], [hi, fit.predict(hi)]])
                                .color(*color)
                                .width(2.0)
                                .name(name);
                            plot_ui.line(line);
                        }
                    }
                }
            });
    }
}

/// Placeholder shown when the filters leave nothing to plot.
pub fn empty_notice(ui: &mut Ui) {
    ui.add_space(8.0);
    ui.label(egui::RichText::new("No campaigns match the current filters.").italics());
    ui.add_space(8.0);
}

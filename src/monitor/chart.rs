//! Line-chart widget for a [`ChartProjection`].
//!
//! One braille line per fill bucket, x positions taken from the projection
//! index, y scaled to the largest count with a little headroom.

use crate::projection::ChartProjection;
use crate::sample::FillBucket;
use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Color, Style};
use ratatui::symbols::Marker;
use ratatui::widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Widget};

/// Line color for a bucket.
#[must_use]
pub fn bucket_color(bucket: FillBucket) -> Color {
    match bucket {
        FillBucket::Filled90 => Color::Red,
        FillBucket::Filled50 => Color::Yellow,
        FillBucket::Filled30 => Color::Cyan,
        FillBucket::Below30 => Color::Green,
    }
}

/// Renders the four bucket series of a projection.
#[derive(Debug, Clone)]
pub struct FillChart<'a> {
    projection: &'a ChartProjection,
    title: &'a str,
}

impl<'a> FillChart<'a> {
    /// Creates a chart over `projection`.
    #[must_use]
    pub fn new(projection: &'a ChartProjection) -> Self {
        Self { projection, title: " Bin fill levels " }
    }

    /// Sets the border title.
    #[must_use]
    pub fn title(mut self, title: &'a str) -> Self {
        self.title = title;
        self
    }

    /// x-axis labels: first, middle and last timestamp.
    fn x_labels(&self) -> Vec<String> {
        let labels = &self.projection.labels;
        match labels.len() {
            0 => Vec::new(),
            1 => vec![labels[0].clone()],
            n => vec![labels[0].clone(), labels[n / 2].clone(), labels[n - 1].clone()],
        }
    }

    fn y_max(&self) -> f64 {
        (f64::from(self.projection.max_count()) * 1.1).ceil().max(1.0)
    }
}

impl Widget for FillChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let points: Vec<(FillBucket, Vec<(f64, f64)>)> = self
            .projection
            .series
            .iter()
            .map(|s| {
                let data = s
                    .data
                    .iter()
                    .enumerate()
                    .map(|(i, &v)| (i as f64, f64::from(v)))
                    .collect();
                (s.bucket, data)
            })
            .collect();

        let datasets: Vec<Dataset<'_>> = points
            .iter()
            .map(|(bucket, data)| {
                Dataset::default()
                    .name(bucket.label())
                    .marker(Marker::Braille)
                    .graph_type(GraphType::Line)
                    .style(Style::default().fg(bucket_color(*bucket)))
                    .data(data)
            })
            .collect();

        let x_max = self.projection.len().saturating_sub(1).max(1) as f64;
        let y_max = self.y_max();

        Chart::new(datasets)
            .block(Block::default().title(self.title).borders(Borders::ALL))
            .x_axis(
                Axis::default()
                    .style(Style::default().fg(Color::Gray))
                    .bounds([0.0, x_max])
                    .labels(self.x_labels()),
            )
            .y_axis(
                Axis::default()
                    .title("bins")
                    .style(Style::default().fg(Color::Gray))
                    .bounds([0.0, y_max])
                    .labels(vec!["0".to_string(), format!("{}", y_max as u64)]),
            )
            .hidden_legend_constraints((Constraint::Ratio(1, 2), Constraint::Ratio(1, 2)))
            .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::FillLevelSample;
    use crate::series::TimedSample;
    use chrono::{Local, TimeDelta};

    fn projection(n: u32) -> ChartProjection {
        let start = Local::now();
        let entries: Vec<_> = (0..n)
            .map(|i| TimedSample {
                timestamp: start + TimeDelta::seconds(i64::from(i)),
                sample: FillLevelSample::new(i, 10, 20, 70 - i),
            })
            .collect();
        ChartProjection::from_entries(&entries, "%H:%M:%S")
    }

    fn buffer_text(buf: &Buffer) -> String {
        buf.content().iter().map(ratatui::buffer::Cell::symbol).collect()
    }

    #[test]
    fn test_renders_title() {
        let area = Rect::new(0, 0, 80, 20);
        let mut buf = Buffer::empty(area);
        let projection = projection(10);

        FillChart::new(&projection).title(" City ").render(area, &mut buf);
        assert!(buffer_text(&buf).contains("City"));
    }

    #[test]
    fn test_renders_empty_projection() {
        let area = Rect::new(0, 0, 40, 10);
        let mut buf = Buffer::empty(area);
        let projection = projection(0);

        FillChart::new(&projection).render(area, &mut buf);
    }

    #[test]
    fn test_x_labels() {
        let p = projection(10);
        let chart = FillChart::new(&p);
        let labels = chart.x_labels();

        assert_eq!(labels.len(), 3);
        assert_eq!(labels[0], p.labels[0]);
        assert_eq!(labels[2], p.labels[9]);
        assert_eq!(FillChart::new(&projection(1)).x_labels().len(), 1);
    }

    #[test]
    fn test_y_max_has_headroom() {
        let p = projection(10);
        assert!(FillChart::new(&p).y_max() >= 70.0);
        assert!((FillChart::new(&projection(0)).y_max() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_bucket_colors_distinct() {
        let colors: std::collections::HashSet<_> =
            FillBucket::ALL.iter().map(|&b| bucket_color(b)).collect();
        assert_eq!(colors.len(), 4);
    }
}

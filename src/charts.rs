use crate::analytics::{AggregationResult, PerformanceHistory};
use crate::error::ChartError;
use crate::time_format::format_submission_date;
use log::{debug, info, warn};
use plotters::prelude::*;
use plotters::style::{FontStyle, register_font};
use std::error::Error;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

pub const TOPIC_ACCURACY_CHART: &str = "topic_accuracy_bar_chart.png";
pub const ACCURACY_TREND_CHART: &str = "accuracy_trend_line_chart.png";
pub const SCORE_HISTOGRAM_CHART: &str = "quiz_score_distribution_histogram.png";
pub const TOPIC_DURATION_CHART: &str = "topic_quiz_duration_bar_chart.png";
pub const WEAK_VS_STRONG_CHART: &str = "weak_vs_strong_topics_bar_chart.png";

pub const SCORE_HISTOGRAM_BINS: usize = 10;

const FONT: &str = "sans-serif";
const WEAKEST_COLOR: RGBColor = RGBColor(0xf0, 0x55, 0x55);
const STRONGEST_COLOR: RGBColor = RGBColor(0x44, 0xbb, 0x44);

/// Tried in order when no font is given on the command line.
const SYSTEM_FONTS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation/LiberationSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

static REGISTERED_FONT: OnceLock<Option<PathBuf>> = OnceLock::new();

type DrawResult = Result<(), Box<dyn Error>>;

/// Make a TrueType font available to every chart. Only the first call in a
/// process has an effect. Returns the registered file, if any.
pub fn register_chart_font(preferred: Option<&Path>) -> Option<&'static Path> {
    REGISTERED_FONT
        .get_or_init(|| {
            let candidates = preferred
                .map(Path::to_path_buf)
                .into_iter()
                .chain(SYSTEM_FONTS.iter().map(PathBuf::from));

            for path in candidates {
                let Ok(bytes) = std::fs::read(&path) else {
                    debug!("No font at {}", path.display());
                    continue;
                };
                // The font registry keeps a 'static borrow for the process lifetime
                let bytes: &'static [u8] = Box::leak(bytes.into_boxed_slice());
                if register_font(FONT, FontStyle::Normal, bytes).is_ok() {
                    info!("Using chart font {}", path.display());
                    return Some(path);
                }
                warn!("Ignoring unreadable font {}", path.display());
            }
            warn!("No usable font found; chart text cannot be drawn");
            None
        })
        .as_deref()
}

/// One bin of the score histogram. `end` is exclusive except for the last bin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreBin {
    pub start: f64,
    pub end: f64,
    pub count: u32,
}

/// Split `scores` into `bins` equal-width bins spanning their range. A single
/// distinct value gets a range of one unit centred on it.
pub fn histogram_bins(scores: &[f64], bins: usize) -> Vec<ScoreBin> {
    if scores.is_empty() || bins == 0 {
        return Vec::new();
    }

    let min = scores.iter().copied().fold(f64::INFINITY, f64::min);
    let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let (low, high) = if max > min {
        (min, max)
    } else {
        (min - 0.5, max + 0.5)
    };
    let width = (high - low) / bins as f64;

    let mut counts = vec![0u32; bins];
    for &score in scores {
        let index = (((score - low) / width).floor() as usize).min(bins - 1);
        counts[index] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| ScoreBin {
            start: low + width * i as f64,
            end: low + width * (i + 1) as f64,
            count,
        })
        .collect()
}

/// Date label and accuracy for every history entry, oldest first.
pub fn accuracy_trend_points(history: &PerformanceHistory) -> Vec<(String, f64)> {
    history
        .entries()
        .iter()
        .map(|entry| (format_submission_date(entry.submitted_at), entry.accuracy))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopicCategory {
    Weakest,
    Strongest,
}

impl TopicCategory {
    pub fn label(&self) -> &'static str {
        match self {
            TopicCategory::Weakest => "Weakest",
            TopicCategory::Strongest => "Strongest",
        }
    }
}

/// Bottom three followed by top three topics. A topic can appear in both
/// groups when there are fewer than six topics.
pub fn weak_vs_strong_bars(result: &AggregationResult) -> Vec<(String, f64, TopicCategory)> {
    let weakest = result
        .weak_areas()
        .into_iter()
        .map(|topic| (topic, TopicCategory::Weakest));
    let strongest = result
        .strong_areas()
        .into_iter()
        .map(|topic| (topic, TopicCategory::Strongest));

    weakest
        .chain(strongest)
        .filter_map(|(topic, category)| {
            result
                .topic(topic)
                .map(|stats| (stats.topic.clone(), stats.avg_accuracy, category))
        })
        .collect()
}

/// Files written by one rendering pass and the charts that failed.
#[derive(Debug, Default)]
pub struct ChartReport {
    pub generated: Vec<String>,
    pub failures: Vec<ChartError>,
}

/// Draw every chart into `output_dir`. Each chart fails on its own; the
/// directory itself is the only shared prerequisite.
pub fn render_all(
    result: &AggregationResult,
    output_dir: &Path,
    font: Option<&Path>,
) -> ChartReport {
    let mut report = ChartReport::default();

    if let Err(e) = std::fs::create_dir_all(output_dir) {
        report.failures.push(ChartError::OutputDir {
            path: output_dir.display().to_string(),
            message: e.to_string(),
        });
        return report;
    }

    if !result.topics().is_empty() {
        register_chart_font(font);
    }

    let topics: Vec<String> = result.topics().iter().map(|t| t.topic.clone()).collect();
    let accuracies: Vec<f64> = result.topics().iter().map(|t| t.avg_accuracy).collect();
    let durations: Vec<f64> = result
        .topics()
        .iter()
        .map(|t| t.avg_duration_minutes)
        .collect();
    let scores: Vec<f64> = result.history().score_trend();
    let trend = accuracy_trend_points(result.history());
    let comparison = weak_vs_strong_bars(result);

    let outcomes = [
        (
            TOPIC_ACCURACY_CHART,
            topics.is_empty(),
            draw_bar_chart(
                &output_dir.join(TOPIC_ACCURACY_CHART),
                "Topic-wise Average Quiz Accuracy",
                "Average Accuracy (%)",
                &topics,
                &accuracies,
                100.0,
                &BLUE,
            ),
        ),
        (
            ACCURACY_TREND_CHART,
            trend.is_empty(),
            draw_trend_chart(&output_dir.join(ACCURACY_TREND_CHART), &trend),
        ),
        (
            SCORE_HISTOGRAM_CHART,
            scores.is_empty(),
            draw_score_histogram(
                &output_dir.join(SCORE_HISTOGRAM_CHART),
                &histogram_bins(&scores, SCORE_HISTOGRAM_BINS),
            ),
        ),
        (
            TOPIC_DURATION_CHART,
            topics.is_empty(),
            draw_bar_chart(
                &output_dir.join(TOPIC_DURATION_CHART),
                "Topic-wise Average Quiz Duration",
                "Average Quiz Duration (Minutes)",
                &topics,
                &durations,
                axis_max(&durations),
                &CYAN,
            ),
        ),
        (
            WEAK_VS_STRONG_CHART,
            comparison.is_empty(),
            draw_weak_vs_strong_chart(&output_dir.join(WEAK_VS_STRONG_CHART), &comparison),
        ),
    ];

    for (name, empty, outcome) in outcomes {
        if empty {
            report.failures.push(ChartError::NoData {
                chart: name.to_string(),
            });
            continue;
        }
        match outcome {
            Ok(()) => {
                info!("Saved chart {}", name);
                report.generated.push(name.to_string());
            }
            Err(e) => {
                warn!("Could not draw {}: {}", name, e);
                report.failures.push(ChartError::Drawing {
                    chart: name.to_string(),
                    message: e.to_string(),
                });
            }
        }
    }

    report
}

fn axis_max(values: &[f64]) -> f64 {
    let max = values.iter().copied().fold(0.0, f64::max);
    if max > 0.0 { max * 1.1 } else { 1.0 }
}

fn draw_bar_chart(
    path: &Path,
    caption: &str,
    y_desc: &str,
    labels: &[String],
    values: &[f64],
    y_max: f64,
    color: &RGBColor,
) -> DrawResult {
    if labels.is_empty() {
        return Ok(());
    }

    let root = BitMapBackend::new(path, (1200, 600)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(caption, (FONT, 28))
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(60)
        .build_cartesian_2d((0..labels.len() as i32).into_segmented(), 0f64..y_max)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc("Topics")
        .y_desc(y_desc)
        .x_labels(labels.len())
        .x_label_formatter(&|x| match x {
            SegmentValue::CenterOf(i) => labels.get(*i as usize).cloned().unwrap_or_default(),
            _ => String::new(),
        })
        .draw()?;

    chart.draw_series(
        Histogram::vertical(&chart)
            .style(color.mix(0.8).filled())
            .margin(8)
            .data(values.iter().enumerate().map(|(i, v)| (i as i32, *v))),
    )?;

    root.present()?;
    Ok(())
}

fn draw_trend_chart(path: &Path, points: &[(String, f64)]) -> DrawResult {
    if points.is_empty() {
        return Ok(());
    }

    let root = BitMapBackend::new(path, (1000, 500)).into_drawing_area();
    root.fill(&WHITE)?;

    let last = points.len() as i32 - 1;
    let mut chart = ChartBuilder::on(&root)
        .caption("Quiz Accuracy Trend Over Time", (FONT, 28))
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(60)
        .build_cartesian_2d(-1..last + 1, 0f64..100f64)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc("Quiz Submission Date")
        .y_desc("Accuracy (%)")
        .x_labels(points.len().min(12) + 2)
        .x_label_formatter(&|x| {
            usize::try_from(*x)
                .ok()
                .and_then(|i| points.get(i))
                .map(|(date, _)| date.clone())
                .unwrap_or_default()
        })
        .draw()?;

    let series: Vec<(i32, f64)> = points
        .iter()
        .enumerate()
        .map(|(i, (_, accuracy))| (i as i32, *accuracy))
        .collect();

    chart.draw_series(LineSeries::new(series.iter().copied(), &BLUE))?;
    chart.draw_series(
        series
            .iter()
            .map(|&point| Circle::new(point, 4, BLUE.filled())),
    )?;

    root.present()?;
    Ok(())
}

fn draw_score_histogram(path: &Path, bins: &[ScoreBin]) -> DrawResult {
    let (Some(first), Some(last)) = (bins.first(), bins.last()) else {
        return Ok(());
    };
    let peak = bins.iter().map(|bin| bin.count).max().unwrap_or(0);

    let root = BitMapBackend::new(path, (800, 500)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Distribution of Quiz Scores", (FONT, 28))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(50)
        .build_cartesian_2d(first.start..last.end, 0f64..(peak + 1) as f64)?;

    chart
        .configure_mesh()
        .x_desc("Quiz Score")
        .y_desc("Frequency")
        .draw()?;

    chart.draw_series(bins.iter().map(|bin| {
        Rectangle::new(
            [(bin.start, 0.0), (bin.end, bin.count as f64)],
            RED.mix(0.5).filled(),
        )
    }))?;

    root.present()?;
    Ok(())
}

fn draw_weak_vs_strong_chart(path: &Path, bars: &[(String, f64, TopicCategory)]) -> DrawResult {
    if bars.is_empty() {
        return Ok(());
    }

    let root = BitMapBackend::new(path, (1000, 600)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(
            "Comparison: Average Accuracy - Weakest vs. Strongest Topics",
            (FONT, 24),
        )
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(60)
        .build_cartesian_2d((0..bars.len() as i32).into_segmented(), 0f64..100f64)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc("Topics")
        .y_desc("Average Accuracy (%)")
        .x_labels(bars.len())
        .x_label_formatter(&|x| match x {
            SegmentValue::CenterOf(i) => bars
                .get(*i as usize)
                .map(|(topic, _, _)| topic.clone())
                .unwrap_or_default(),
            _ => String::new(),
        })
        .draw()?;

    for (category, color) in [
        (TopicCategory::Weakest, WEAKEST_COLOR),
        (TopicCategory::Strongest, STRONGEST_COLOR),
    ] {
        chart
            .draw_series(
                Histogram::vertical(&chart)
                    .style(color.filled())
                    .margin(8)
                    .data(
                        bars.iter()
                            .enumerate()
                            .filter(|(_, (_, _, c))| *c == category)
                            .map(|(i, (_, accuracy, _))| (i as i32, *accuracy)),
                    ),
            )?
            .label(category.label())
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 16, y + 5)], color.filled()));
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::aggregate;
    use crate::records::QuizAttempt;
    use chrono::{Duration, TimeZone, Utc};
    use tempfile::TempDir;

    fn attempt(topic: &str, accuracy: f64, score: f64, day: u32) -> QuizAttempt {
        let started_at = Utc.with_ymd_and_hms(2025, 1, day, 9, 0, 0).unwrap();
        QuizAttempt {
            topic: topic.to_string(),
            accuracy,
            score,
            correct_answers: 8,
            incorrect_answers: 2,
            submitted_at: started_at + Duration::minutes(10),
            started_at,
            ended_at: started_at + Duration::minutes(10),
        }
    }

    #[test]
    fn test_histogram_bins_cover_range() {
        let bins = histogram_bins(&[0.0, 5.0, 10.0], 10);

        assert_eq!(bins.len(), 10);
        assert_eq!(bins[0].count, 1);
        assert_eq!(bins[5].count, 1);
        // The maximum lands in the last, closed bin
        assert_eq!(bins[9].count, 1);
        assert!((bins[0].start - 0.0).abs() < 0.001);
        assert!((bins[9].end - 10.0).abs() < 0.001);
    }

    #[test]
    fn test_histogram_single_value() {
        let bins = histogram_bins(&[7.0, 7.0], 10);

        let total: u32 = bins.iter().map(|bin| bin.count).sum();
        assert_eq!(total, 2);
        assert!((bins[0].start - 6.5).abs() < 0.001);
        assert!((bins[9].end - 7.5).abs() < 0.001);
    }

    #[test]
    fn test_histogram_empty() {
        assert!(histogram_bins(&[], 10).is_empty());
        assert!(histogram_bins(&[1.0], 0).is_empty());
    }

    #[test]
    fn test_trend_points_are_dated_and_ordered() {
        let result = aggregate(&[
            attempt("Optics", 60.0, 30.0, 5),
            attempt("Optics", 40.0, 20.0, 2),
        ]);
        let points = accuracy_trend_points(result.history());

        assert_eq!(
            points,
            vec![
                ("2025-01-02".to_string(), 40.0),
                ("2025-01-05".to_string(), 60.0)
            ]
        );
    }

    #[test]
    fn test_weak_vs_strong_bars() {
        let result = aggregate(&[
            attempt("Optics", 30.0, 10.0, 1),
            attempt("Ecology", 90.0, 40.0, 2),
        ]);
        let bars = weak_vs_strong_bars(&result);

        assert_eq!(bars.len(), 4);
        assert_eq!(bars[0], ("Optics".to_string(), 30.0, TopicCategory::Weakest));
        assert_eq!(bars[1].2, TopicCategory::Weakest);
        assert_eq!(
            bars[2],
            ("Ecology".to_string(), 90.0, TopicCategory::Strongest)
        );
    }

    #[test]
    fn test_axis_max() {
        assert_eq!(axis_max(&[]), 1.0);
        assert!((axis_max(&[10.0, 5.0]) - 11.0).abs() < 0.001);
    }

    #[test]
    fn test_no_data_is_reported_per_chart() {
        let temp = TempDir::new().unwrap();
        let report = render_all(&aggregate(&[]), temp.path(), None);

        assert!(report.generated.is_empty());
        assert_eq!(report.failures.len(), 5);
        assert!(
            report
                .failures
                .iter()
                .all(|e| matches!(e, ChartError::NoData { .. }))
        );
    }

    #[test]
    fn test_unwritable_output_dir() {
        let temp = TempDir::new().unwrap();
        let blocker = temp.path().join("file");
        std::fs::write(&blocker, "x").unwrap();

        let report = render_all(&aggregate(&[]), &blocker.join("charts"), None);
        assert!(matches!(
            report.failures.as_slice(),
            [ChartError::OutputDir { .. }]
        ));
    }

    // Needs one of the system fonts for captions and labels
    #[test]
    #[ignore]
    fn test_render_all_charts() {
        let temp = TempDir::new().unwrap();
        let result = aggregate(&[
            attempt("Optics", 30.0, 10.0, 1),
            attempt("Genetics", 50.0, 20.0, 2),
            attempt("Ecology", 90.0, 40.0, 3),
        ]);

        let report = render_all(&result, temp.path(), None);

        assert!(report.failures.is_empty(), "{:?}", report.failures);
        assert_eq!(report.generated.len(), 5);
        for name in &report.generated {
            assert!(temp.path().join(name).exists());
        }
    }
}

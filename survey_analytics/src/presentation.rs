//! Turns answer tallies into series that a chart or a table can render directly.

use crate::config::*;

/// Colours assigned to the points of a series, cycled when there are more points.
pub const PALETTE: [&str; 8] = [
    "#3B82F6", "#10B981", "#F59E0B", "#EF4444", "#8B5CF6", "#EC4899", "#14B8A6", "#F97316",
];

const MIN_BAR_HEIGHT: u32 = 300;
const BAR_ROW_HEIGHT: u32 = 60;

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum ChartKind {
    Bar,
    Pie,
    Table,
}

impl ChartKind {
    pub fn parse(s: &str) -> Option<ChartKind> {
        match s.to_lowercase().as_str() {
            "bar" => Some(ChartKind::Bar),
            "pie" => Some(ChartKind::Pie),
            "table" => Some(ChartKind::Table),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ChartKind::Bar => "bar",
            ChartKind::Pie => "pie",
            ChartKind::Table => "table",
        }
    }
}

#[derive(PartialEq, Debug, Clone)]
pub struct ChartPoint {
    pub label: String,
    pub full_label: String,
    pub count: u64,
    pub percentage: f64,
    pub color: String,
    pub is_other: bool,
}

#[derive(PartialEq, Debug, Clone)]
pub struct ChartSeries {
    pub kind: ChartKind,
    pub title: Option<String>,
    pub points: Vec<ChartPoint>,
    /// Suggested drawing height in pixels, only for bar charts.
    pub height: Option<u32>,
}

pub fn to_chart_series(tally: &AnswerTally, kind: ChartKind) -> ChartSeries {
    let points: Vec<ChartPoint> = tally
        .buckets
        .iter()
        .enumerate()
        .map(|(idx, b)| ChartPoint {
            label: match kind {
                ChartKind::Pie => format!("{} ({:.1}%)", b.answer, b.percentage),
                _ => b.answer.clone(),
            },
            full_label: b.full_answer.clone(),
            count: b.count,
            percentage: b.percentage,
            color: PALETTE[idx % PALETTE.len()].to_string(),
            is_other: b.is_other,
        })
        .collect();
    let height = match kind {
        ChartKind::Bar => Some(MIN_BAR_HEIGHT.max(BAR_ROW_HEIGHT * points.len() as u32)),
        _ => None,
    };
    ChartSeries {
        kind,
        title: tally.sub_question.clone(),
        points,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bucket(answer: &str, count: u64, percentage: f64) -> AnswerBucket {
        AnswerBucket {
            answer: answer.to_string(),
            full_answer: answer.to_string(),
            count,
            percentage,
            is_other: false,
            other_answers: vec![],
        }
    }

    fn tally(n: usize) -> AnswerTally {
        AnswerTally {
            sub_question: Some("पहिलो".to_string()),
            buckets: (0..n).map(|i| bucket(&format!("a{}", i), 1, 10.0)).collect(),
            respondents_by_answer: vec![],
            answered: n as u64,
            total_respondents: 10,
        }
    }

    #[test]
    fn bar_heights_and_colours() {
        let small = to_chart_series(&tally(3), ChartKind::Bar);
        assert_eq!(small.height, Some(300));
        assert_eq!(small.title.as_deref(), Some("पहिलो"));
        let big = to_chart_series(&tally(9), ChartKind::Bar);
        assert_eq!(big.height, Some(540));
        assert_eq!(big.points[0].color, PALETTE[0]);
        assert_eq!(big.points[8].color, PALETTE[0]);
        assert_eq!(big.points[7].color, "#F97316");
    }

    #[test]
    fn pie_labels() {
        let mut t = tally(1);
        t.buckets[0] = bucket("सडक", 3, 30.0);
        let pie = to_chart_series(&t, ChartKind::Pie);
        assert_eq!(pie.points[0].label, "सडक (30.0%)");
        assert_eq!(pie.height, None);
        let table = to_chart_series(&t, ChartKind::Table);
        assert_eq!(table.points[0].label, "सडक");
    }

    #[test]
    fn chart_kinds() {
        assert_eq!(ChartKind::parse("Pie"), Some(ChartKind::Pie));
        assert_eq!(ChartKind::parse("donut"), None);
        assert_eq!(ChartKind::Table.name(), "table");
    }
}

// src/presentation/mod.rs
//! View-model helpers for the optimization result screens: colours, gauge
//! geometry, per-bullet comparisons and skill chips.

pub mod report;

pub use report::render_report;

use std::f64::consts::PI;

use crate::types::optimization::{
    Achievement, Evaluation, OptimizationResult, QualityBreakdownItem,
};

pub const NEUTRAL_COLOR: &str = "#6b7280";

/// Radius of the overview score ring
pub const GAUGE_RADIUS: f64 = 54.0;

/// Score at or above which an unfixed bullet counts as strong
pub const STRONG_BULLET_SCORE: f64 = 7.0;

pub fn grade_color(grade: &str) -> &'static str {
    match grade {
        "A+" => "#059669",
        "A" => "#10b981",
        "A-" => "#34d399",
        "B+" => "#3b82f6",
        "B" => "#60a5fa",
        "B-" => "#93c5fd",
        "C+" => "#f59e0b",
        "C" => "#fbbf24",
        "C-" => "#fcd34d",
        "D" => "#ef4444",
        "F" => "#dc2626",
        _ => NEUTRAL_COLOR,
    }
}

/// Colour for `score` out of `max`
pub fn score_color(score: f64, max: f64) -> &'static str {
    let percentage = percentage(score, max);
    if percentage >= 80.0 {
        "#10b981"
    } else if percentage >= 60.0 {
        "#3b82f6"
    } else if percentage >= 40.0 {
        "#f59e0b"
    } else {
        "#ef4444"
    }
}

/// `score / max` as a percentage; 0 when `max` is 0
pub fn percentage(score: f64, max: f64) -> f64 {
    if max == 0.0 {
        0.0
    } else {
        score / max * 100.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreGauge {
    pub circumference: f64,
    pub dash_offset: f64,
    pub color: &'static str,
}

impl ScoreGauge {
    pub fn new(quality_score: f64) -> Self {
        let circumference = 2.0 * PI * GAUGE_RADIUS;
        Self {
            circumference,
            dash_offset: circumference - (quality_score / 100.0) * circumference,
            color: score_color(quality_score, 100.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BreakdownBar {
    pub name: String,
    pub score: f64,
    pub max: f64,
    pub percentage: f64,
    pub color: &'static str,
}

impl From<&QualityBreakdownItem> for BreakdownBar {
    fn from(item: &QualityBreakdownItem) -> Self {
        Self {
            name: item.name.clone(),
            score: item.score,
            max: item.max,
            percentage: percentage(item.score, item.max),
            color: score_color(item.score, item.max),
        }
    }
}

pub fn breakdown_bars(result: &OptimizationResult) -> Vec<BreakdownBar> {
    result
        .quality_report()
        .map(|report| report.breakdown.iter().map(BreakdownBar::from).collect())
        .unwrap_or_default()
}

/// Overall experience score gained by the rewrite, when both sides were evaluated
pub fn experience_improvement(evaluation: &Evaluation) -> Option<f64> {
    let original = evaluation.experience_original.as_ref()?;
    let fixed = evaluation.experience_fixed.as_ref()?;
    Some(fixed.overall_score - original.overall_score)
}

/// One bullet as the experience analyzer shows it
#[derive(Debug, Clone, PartialEq)]
pub struct AchievementView<'a> {
    pub text: &'a str,
    pub score: f64,
    pub color: &'static str,
    /// Rewritten text with its score, only when the bullet was fixed
    pub fixed: Option<(&'a str, f64)>,
    pub delta: Option<f64>,
    /// Edits listed by the server for a fixed bullet
    pub changes: &'a [String],
    pub no_fix_needed: bool,
}

impl<'a> AchievementView<'a> {
    pub fn new(achievement: &'a Achievement) -> Self {
        let was_fixed = achievement.was_fixed.unwrap_or(false);
        let fixed = match (&achievement.fixed, was_fixed) {
            (Some(text), true) => Some((text.as_str(), achievement.fixed_score.unwrap_or(0.0))),
            _ => None,
        };

        Self {
            text: &achievement.text,
            score: achievement.score,
            color: score_color(achievement.score, 10.0),
            fixed,
            delta: fixed.map(|(_, fixed_score)| fixed_score - achievement.score),
            changes: match (fixed, &achievement.changes) {
                (Some(_), Some(changes)) => changes.as_slice(),
                _ => &[],
            },
            no_fix_needed: !was_fixed && achievement.score >= STRONG_BULLET_SCORE,
        }
    }

    pub fn fixed_color(&self) -> Option<&'static str> {
        self.fixed.map(|(_, score)| score_color(score, 10.0))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChipStyle {
    pub background: &'static str,
    pub text: &'static str,
}

pub fn category_style(category: &str) -> ChipStyle {
    let (background, text) = match category {
        "Programming Languages" => ("#eff6ff", "#1e40af"),
        "Frontend" => ("#f0fdf4", "#166534"),
        "Backend" => ("#fef3c7", "#92400e"),
        "Databases" => ("#fce7f3", "#9d174d"),
        "AI/ML" => ("#f5f3ff", "#5b21b6"),
        "Tools" => ("#ecfdf5", "#065f46"),
        "Architecture" => ("#fff7ed", "#9a3412"),
        "DevOps" => ("#fdf4ff", "#86198f"),
        "Cloud" => ("#f0f9ff", "#0369a1"),
        _ => ("#f3f4f6", "#374151"),
    };
    ChipStyle { background, text }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SkillGroup<'a> {
    pub category: &'a str,
    pub skills: &'a [String],
    pub style: ChipStyle,
}

/// Non-empty skill categories, in category order
pub fn skill_groups(result: &OptimizationResult) -> Vec<SkillGroup<'_>> {
    result
        .skills_detected
        .iter()
        .filter(|(_, skills)| !skills.is_empty())
        .map(|(category, skills)| SkillGroup {
            category,
            skills,
            style: category_style(category),
        })
        .collect()
}

/// Badge colours of the summary grade: A green, B blue, anything else amber
pub fn summary_grade_style(grade: &str) -> ChipStyle {
    match grade {
        "A" => ChipStyle {
            background: "#dcfce7",
            text: "#166534",
        },
        "B" => ChipStyle {
            background: "#dbeafe",
            text: "#1e40af",
        },
        _ => ChipStyle {
            background: "#fef3c7",
            text: "#92400e",
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::optimization::ExperienceEvaluation;

    #[test]
    fn test_grade_colors() {
        assert_eq!(grade_color("A+"), "#059669");
        assert_eq!(grade_color("B-"), "#93c5fd");
        assert_eq!(grade_color("F"), "#dc2626");
        assert_eq!(grade_color("E"), NEUTRAL_COLOR);
        assert_eq!(grade_color(""), NEUTRAL_COLOR);
    }

    #[test]
    fn test_score_color_thresholds() {
        assert_eq!(score_color(80.0, 100.0), "#10b981");
        assert_eq!(score_color(79.9, 100.0), "#3b82f6");
        assert_eq!(score_color(6.0, 10.0), "#3b82f6");
        assert_eq!(score_color(4.0, 10.0), "#f59e0b");
        assert_eq!(score_color(3.9, 10.0), "#ef4444");
        assert_eq!(score_color(5.0, 0.0), "#ef4444");
    }

    #[test]
    fn test_gauge_geometry() {
        let full = ScoreGauge::new(100.0);
        assert!((full.circumference - 339.292).abs() < 0.001);
        assert!(full.dash_offset.abs() < 1e-9);

        let half = ScoreGauge::new(50.0);
        assert!((half.dash_offset - half.circumference / 2.0).abs() < 1e-9);
        assert_eq!(half.color, "#f59e0b");
    }

    #[test]
    fn test_achievement_views() {
        let fixed = Achievement {
            text: "Did things".into(),
            score: 4.0,
            fixed: Some("Cut latency 40%".into()),
            fixed_score: Some(8.5),
            changes: Some(vec!["Added metric".into(), "Stronger verb".into()]),
            was_fixed: Some(true),
            ..Default::default()
        };
        let view = AchievementView::new(&fixed);
        assert_eq!(view.fixed, Some(("Cut latency 40%", 8.5)));
        assert_eq!(view.changes, ["Added metric", "Stronger verb"]);
        assert_eq!(view.delta, Some(4.5));
        assert_eq!(view.fixed_color(), Some("#10b981"));
        assert!(!view.no_fix_needed);

        let strong = Achievement {
            text: "Led team of 5".into(),
            score: 7.0,
            ..Default::default()
        };
        let view = AchievementView::new(&strong);
        assert!(view.no_fix_needed);
        assert_eq!(view.delta, None);
        assert!(view.changes.is_empty());

        let weak = Achievement {
            score: 6.9,
            ..Default::default()
        };
        assert!(!AchievementView::new(&weak).no_fix_needed);
    }

    #[test]
    fn test_experience_improvement() {
        let evaluation = Evaluation {
            experience_original: Some(ExperienceEvaluation {
                overall_score: 55.0,
                ..Default::default()
            }),
            experience_fixed: Some(ExperienceEvaluation {
                overall_score: 80.0,
                ..Default::default()
            }),
            ..Default::default()
        };
        assert_eq!(experience_improvement(&evaluation), Some(25.0));
        assert_eq!(experience_improvement(&Evaluation::default()), None);
    }

    #[test]
    fn test_skill_groups_skip_empty_categories() {
        let mut result = OptimizationResult::default();
        result
            .skills_detected
            .insert("Backend".into(), vec!["Rust".into()]);
        result.skills_detected.insert("Cloud".into(), vec![]);
        result
            .skills_detected
            .insert("Soft Skills".into(), vec!["Mentoring".into()]);

        let groups = skill_groups(&result);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].category, "Backend");
        assert_eq!(groups[0].style.background, "#fef3c7");
        assert_eq!(groups[1].style, category_style("anything"));
    }

    #[test]
    fn test_summary_badge() {
        assert_eq!(summary_grade_style("A").text, "#166534");
        assert_eq!(summary_grade_style("B").text, "#1e40af");
        assert_eq!(summary_grade_style("C").text, "#92400e");
    }
}

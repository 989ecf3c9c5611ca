// src/presentation/report.rs
use std::fmt::Write;

use super::{breakdown_bars, experience_improvement, skill_groups, AchievementView};
use crate::types::optimization::OptimizationResult;

const BAR_WIDTH: usize = 20;

/// Plain-text rendering of a result, section by section like the results page
pub fn render_report(result: &OptimizationResult) -> String {
    let mut out = String::new();
    // writing into a String cannot fail
    let _ = write_report(&mut out, result);
    out
}

fn write_report(out: &mut String, result: &OptimizationResult) -> std::fmt::Result {
    writeln!(out, "CV Analysis Overview")?;
    if let Some(id) = result.optimization_id {
        writeln!(out, "  ID: #{}", id)?;
    }
    if let Some(score) = result.quality_score {
        writeln!(out, "  Score: {:.0}/100", score)?;
    }
    if let Some(grade) = &result.grade {
        writeln!(out, "  Grade: {}", grade)?;
    }
    if let Some(file_name) = &result.file_name {
        writeln!(out, "  Optimized file: {}", file_name)?;
    }

    if let Some(metadata) = &result.metadata {
        writeln!(out)?;
        writeln!(out, "Candidate")?;
        if let Some(name) = &metadata.candidate_name {
            writeln!(out, "  Name: {}", name)?;
        }
        if let Some(original) = &metadata.original_filename {
            writeln!(out, "  Source: {}", original)?;
        }
        if let Some(pages) = metadata.page_count {
            writeln!(out, "  Pages: {}", pages)?;
        }
    }

    if let Some(contact) = &result.contact_info {
        if let Some(email) = &contact.email {
            writeln!(out, "  Email: {}", email)?;
        }
        if let Some(phone) = &contact.phone {
            writeln!(out, "  Phone: {}", phone)?;
        }
        for link in &contact.links {
            writeln!(out, "  Link: {}", link)?;
        }
    }

    if let Some(summary) = result.summary.as_deref().filter(|s| !s.trim().is_empty()) {
        writeln!(out)?;
        writeln!(out, "Summary")?;
        writeln!(out, "  {}", summary.trim())?;
        if let Some(evaluation) = result.summary_evaluation() {
            write!(out, "  {} words", evaluation.word_count)?;
            if let Some(grade) = &evaluation.grade {
                write!(out, ", grade {}", grade)?;
            }
            writeln!(out)?;
            for issue in &evaluation.issues {
                writeln!(out, "  ! {}", issue)?;
            }
        }
    }

    if !result.experience_analyzed.is_empty() {
        writeln!(out)?;
        writeln!(out, "Experience")?;
        if let Some(stats) = &result.experience_fix_stats {
            writeln!(
                out,
                "  {} of {} bullets improved",
                stats.fixed_bullets, stats.total_bullets
            )?;
        }
        for job in &result.experience_analyzed {
            let heading = job
                .parsed_header
                .as_ref()
                .and_then(|h| h.raw.clone().or_else(|| h.title.clone()))
                .or_else(|| job.headers.first().cloned())
                .unwrap_or_else(|| "Position".to_string());
            writeln!(out, "  {}", heading)?;

            for (index, achievement) in job.achievements.iter().enumerate() {
                let view = AchievementView::new(achievement);
                writeln!(out, "    {}. [{}/10] {}", index + 1, view.score, view.text)?;
                for feedback in &achievement.feedback {
                    writeln!(out, "       - {}", feedback)?;
                }
                if let (Some((fixed, fixed_score)), Some(delta)) = (view.fixed, view.delta) {
                    writeln!(out, "       => [{}/10, +{}] {}", fixed_score, delta, fixed)?;
                    if !view.changes.is_empty() {
                        writeln!(out, "          Changes applied: {}", view.changes.join(", "))?;
                    }
                }
                if view.no_fix_needed {
                    writeln!(out, "       Strong achievement - no changes needed")?;
                }
            }
        }
    }

    let groups = skill_groups(result);
    writeln!(out)?;
    writeln!(out, "Skills Detected")?;
    if groups.is_empty() {
        writeln!(out, "  No skills detected")?;
    }
    for group in groups {
        writeln!(out, "  {}: {}", group.category, group.skills.join(", "))?;
    }

    write_list(out, "Education", &result.education)?;
    write_list(out, "Projects", &result.projects)?;
    write_list(out, "Certifications", &result.certifications)?;
    write_list(out, "Languages", &result.languages)?;

    let bars = breakdown_bars(result);
    if !bars.is_empty() {
        writeln!(out)?;
        writeln!(out, "Quality Breakdown")?;
        for bar in bars {
            let filled = ((bar.percentage.clamp(0.0, 100.0) / 100.0) * BAR_WIDTH as f64).round() as usize;
            writeln!(
                out,
                "  {:<24} {}{} {}/{}",
                bar.name,
                "#".repeat(filled),
                ".".repeat(BAR_WIDTH - filled),
                bar.score,
                bar.max
            )?;
        }
    }

    if let Some(improvement) = result.evaluation.as_ref().and_then(experience_improvement) {
        writeln!(out)?;
        writeln!(out, "Experience score improved by +{:.0} points", improvement)?;
    }

    if let Some(validation) = &result.validation {
        writeln!(out)?;
        writeln!(
            out,
            "Validation: {} (score {})",
            if validation.is_valid { "valid" } else { "invalid" },
            validation.score
        )?;
        for warning in &validation.warnings {
            writeln!(out, "  warning: {}", warning)?;
        }
        for issue in &validation.issues {
            writeln!(out, "  issue: {}", issue)?;
        }
    }

    if let Some(report) = result.quality_report() {
        if !report.recommendations.is_empty() {
            write_list(out, "Recommendations", &report.recommendations)?;
        }
    }

    Ok(())
}

fn write_list(out: &mut String, title: &str, items: &[String]) -> std::fmt::Result {
    if items.is_empty() {
        return Ok(());
    }
    writeln!(out)?;
    writeln!(out, "{}", title)?;
    for item in items {
        writeln!(out, "  * {}", item)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use brainclock::libs::metrics::MetricSample;
    use brainclock::libs::prompt::{build_prompt, format_row, Instruction};
    use chrono::NaiveDateTime;

    fn sample() -> MetricSample {
        let mut row = MetricSample::new(NaiveDateTime::parse_from_str("2024-03-01 09:05:00", "%Y-%m-%d %H:%M:%S").unwrap());
        row.cognitive_score = Some(72);
        row.relaxation_index = Some(0.25);
        row
    }

    #[test]
    fn test_format_row_utc() {
        let line = format_row(&sample(), true);
        assert!(line.starts_with("2024-03-01 09:05 UTC | cognitive_score:72, focus:None"));
        assert!(line.contains("relaxation_index:0.25"));
        assert!(line.ends_with("heart_rate:None"));
        assert_eq!(line.matches(':').count(), 13);
    }

    #[test]
    fn test_format_row_local_has_no_suffix() {
        let line = format_row(&sample(), false);
        assert!(!line.contains("UTC"));
        assert!(line.contains(" | cognitive_score:72"));
    }

    #[test]
    fn test_build_prompt_sections() {
        let rows = vec![sample(), sample()];
        let prompt = build_prompt("Ann", Some(10.5), &rows, Instruction::DayPlan, true);
        assert!(prompt.contains("User: Ann\n"));
        assert!(prompt.contains("Individual alpha frequency (IAF): 10.5 Hz"));
        assert_eq!(prompt.matches("2024-03-01 09:05 UTC").count(), 2);
        assert!(prompt.contains(Instruction::DayPlan.text()));
        assert!(prompt.contains("Return ONLY valid JSON"));
    }

    #[test]
    fn test_build_prompt_without_iaf() {
        let prompt = build_prompt("Bob", None, &[sample()], Instruction::Improvements, true);
        assert!(!prompt.contains("IAF"));
        assert!(prompt.contains("improvement_suggestions"));
        assert!(!prompt.contains(Instruction::FullAnalysis.text()));
    }
}

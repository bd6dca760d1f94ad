#[cfg(test)]
mod tests {
    use brainclock::libs::period::{find_period_for_time, parse_period_time, AnalysisResult, ProductivityPeriod};
    use chrono::NaiveTime;
    use serde_json::json;

    fn t(raw: &str) -> NaiveTime {
        NaiveTime::parse_from_str(raw, "%H:%M").unwrap()
    }

    fn sample_periods() -> Vec<ProductivityPeriod> {
        vec![
            ProductivityPeriod::new(t("09:00"), t("11:00"), "A"),
            ProductivityPeriod::new(t("11:00"), t("13:00"), "B"),
            ProductivityPeriod::new(t("14:00"), t("15:00"), "C"),
        ]
    }

    #[test]
    fn test_find_period_half_open() {
        let periods = sample_periods();
        assert_eq!(find_period_for_time(&periods, t("10:00")).unwrap().recommended_activity, "A");
        assert_eq!(find_period_for_time(&periods, t("11:00")).unwrap().recommended_activity, "B");
        assert_eq!(find_period_for_time(&periods, t("12:00")).unwrap().recommended_activity, "B");
    }

    #[test]
    fn test_find_period_next_upcoming() {
        let periods = sample_periods();
        assert_eq!(find_period_for_time(&periods, t("08:00")).unwrap().recommended_activity, "A");
        assert_eq!(find_period_for_time(&periods, t("13:30")).unwrap().recommended_activity, "C");
        assert!(find_period_for_time(&periods, t("16:00")).is_none());
        assert!(find_period_for_time(&[], t("10:00")).is_none());
    }

    #[test]
    fn test_find_period_unsorted_input() {
        let mut periods = sample_periods();
        periods.reverse();
        assert_eq!(find_period_for_time(&periods, t("08:30")).unwrap().recommended_activity, "A");
    }

    #[test]
    fn test_parse_period_time() {
        assert_eq!(parse_period_time("10:30"), Some(t("10:30")));
        assert_eq!(parse_period_time("10:30:45"), Some(t("10:30")));
        assert_eq!(parse_period_time(" 09:05 AM"), Some(t("09:05")));
        assert_eq!(parse_period_time("25:00"), None);
        assert_eq!(parse_period_time("soon"), None);
    }

    #[test]
    fn test_result_from_object() {
        let value = json!({
            "productivity_periods": [
                {"start_time": "10:00:00", "end_time": "11:30", "recommended_activity": "Deep work", "productivity_score": 0.9},
                {"start_time": "later", "end_time": "12:00", "recommended_activity": "skipped"},
                {"start_time": "14:30", "end_time": "15:00"}
            ],
            "day_plan": "work, rest",
            "improvement_suggestions": ["walk", "sleep"]
        });
        let result = AnalysisResult::from_object(value.as_object().unwrap());

        assert_eq!(result.periods.len(), 2);
        assert_eq!(result.periods[0].start_time, t("10:00"));
        assert_eq!(result.periods[0].productivity_score, 0.9);
        assert_eq!(result.periods[1].recommended_activity, "");
        assert_eq!(result.periods[1].productivity_score, 0.0);
        assert_eq!(result.day_plan, "work, rest");
        assert_eq!(result.improvement_suggestions, vec!["walk", "sleep"]);
    }

    #[test]
    fn test_result_from_partial_object() {
        let value = json!({"day_plan": "only a plan"});
        let result = AnalysisResult::from_object(value.as_object().unwrap());
        assert!(result.periods.is_empty());
        assert!(result.improvement_suggestions.is_empty());
        assert!(!result.is_empty());

        let empty = AnalysisResult::from_object(json!({}).as_object().unwrap());
        assert!(empty.is_empty());
    }

    #[test]
    fn test_preview_limits() {
        let periods: Vec<ProductivityPeriod> = (8..15)
            .map(|h| ProductivityPeriod::new(NaiveTime::from_hms_opt(h, 0, 0).unwrap(), NaiveTime::from_hms_opt(h, 30, 0).unwrap(), "work"))
            .collect();
        let result = AnalysisResult {
            periods,
            day_plan: "plan".into(),
            improvement_suggestions: vec!["a".into(), "b".into(), "c".into(), "d".into()],
        };

        let preview = result.preview();
        assert_eq!(preview.len(), 5 + 1 + 3);
        assert_eq!(preview[0], "08:00–08:30: work");
        assert_eq!(preview[5], "Day plan: plan");
        assert_eq!(preview[8], "• c");
    }
}

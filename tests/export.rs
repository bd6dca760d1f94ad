#[cfg(test)]
mod tests {
    use brainclock::libs::export::{ExportFormat, Exporter};
    use brainclock::libs::period::ProductivityPeriod;
    use chrono::NaiveTime;
    use std::fs;
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    struct ExportTestContext {
        temp_dir: TempDir,
        periods: Vec<ProductivityPeriod>,
    }

    impl TestContext for ExportTestContext {
        fn setup() -> Self {
            let t = |raw: &str| NaiveTime::parse_from_str(raw, "%H:%M").unwrap();
            ExportTestContext {
                temp_dir: tempfile::tempdir().unwrap(),
                periods: vec![
                    ProductivityPeriod::new(t("10:00"), t("11:30"), "Deep work, complex tasks"),
                    ProductivityPeriod::new(t("14:30"), t("15:00"), "Light tasks"),
                ],
            }
        }
    }

    #[test_context(ExportTestContext)]
    #[test]
    fn test_export_csv(ctx: &mut ExportTestContext) {
        let path = ctx.temp_dir.path().join("periods.csv");
        let written = Exporter::new(ExportFormat::Csv, Some(path.clone())).export_periods(&ctx.periods).unwrap();
        assert_eq!(written, path);

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(
            lines,
            vec![
                "start_time,end_time,recommended_activity",
                "10:00,11:30,\"Deep work, complex tasks\"",
                "14:30,15:00,Light tasks",
            ]
        );
    }

    #[test_context(ExportTestContext)]
    #[test]
    fn test_export_excel(ctx: &mut ExportTestContext) {
        let path = ctx.temp_dir.path().join("periods.xlsx");
        Exporter::new(ExportFormat::Excel, Some(path.clone())).export_periods(&ctx.periods).unwrap();
        let bytes = fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"PK"));
    }

    #[test]
    fn test_default_output_name() {
        let exporter = Exporter::new(ExportFormat::Excel, None);
        let name = exporter.output_path().to_string_lossy().to_string();
        assert!(name.starts_with("brainclock_periods_"));
        assert!(name.ends_with(".xlsx"));
        assert_eq!(ExportFormat::Csv.extension(), "csv");
    }
}

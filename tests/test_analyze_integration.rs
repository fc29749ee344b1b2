//! Integration tests for the full analysis path
//!
//! CSV file → Analyzer → AnalysisResult → export backends, plus the record-level
//! `analyze` entry point with the reference campaign data.

#[cfg(test)]
mod analyze_integration_tests {
    use ads_analytics::analytics_core::{
        analyze, analyze_sharded, AnalysisResult, AnalyticsError, Analyzer, CampaignMetrics,
        RawRecord,
    };
    use ads_analytics::config::ExportBackend;
    use ads_analytics::export::ReportWriter;
    use std::io::Write;
    use std::path::PathBuf;

    const REFERENCE_CSV: &str = "campaign_id,date,impressions,clicks,spend,conversions
CMP1,2023-01-01,1000,10,100.0,2
CMP1,2023-01-02,1000,20,100.0,3
CMP2,2023-01-01,500,50,50.0,1
CMP3,2023-01-01,100,5,20.0,0
CMP4,2023-01-01,2000,200,500.0,10
CMP4,2023-01-02,2000,200,500.0,15
";

    fn write_csv(dir: &tempfile::TempDir, content: &str) -> PathBuf {
        let path = dir.path().join("test_data.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    fn reference_records() -> Vec<RawRecord> {
        vec![
            RawRecord::new(2, "CMP1", 1000, 10, 100.0, 2).unwrap(),
            RawRecord::new(3, "CMP1", 1000, 20, 100.0, 3).unwrap(),
            RawRecord::new(4, "CMP2", 500, 50, 50.0, 1).unwrap(),
            RawRecord::new(5, "CMP3", 100, 5, 20.0, 0).unwrap(),
            RawRecord::new(6, "CMP4", 2000, 200, 500.0, 10).unwrap(),
            RawRecord::new(7, "CMP4", 2000, 200, 500.0, 15).unwrap(),
        ]
    }

    fn ids(list: &[CampaignMetrics]) -> Vec<&str> {
        list.iter().map(|m| m.campaign_id.as_str()).collect()
    }

    fn assert_reference_result(result: &AnalysisResult) {
        // CMP2 and CMP4 tie on CTR 0.10, CMP1 and CMP4 tie on CPA 40.0; id breaks ties
        assert_eq!(ids(&result.top_ctr), vec!["CMP2", "CMP4", "CMP3", "CMP1"]);
        assert_eq!(result.top_ctr[0].ctr, 0.10);
        assert_eq!(result.top_ctr[1].ctr, 0.10);
        assert_eq!(result.top_ctr[2].ctr, 0.05);
        assert_eq!(result.top_ctr[3].ctr, 0.015);
        assert_eq!(result.top_ctr[2].cpa, None);

        assert_eq!(ids(&result.top_cpa), vec!["CMP1", "CMP4", "CMP2"]);
        assert_eq!(result.top_cpa[0].cpa, Some(40.0));
        assert_eq!(result.top_cpa[1].cpa, Some(40.0));
        assert_eq!(result.top_cpa[2].cpa, Some(50.0));

        let cmp4 = &result.top_cpa[1];
        assert_eq!(cmp4.total_impressions, 4000);
        assert_eq!(cmp4.total_clicks, 400);
        assert_eq!(cmp4.total_spend, 1000.0);
        assert_eq!(cmp4.total_conversions, 25);
    }

    #[tokio::test]
    async fn test_analyze_csv_reference_scenario() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(&dir, REFERENCE_CSV);

        let result = Analyzer::default().analyze_csv(&path).await.unwrap();
        assert_reference_result(&result);
    }

    #[test]
    fn test_analyze_records_reference_scenario() {
        let result = analyze(reference_records(), 10).unwrap();
        assert_reference_result(&result);
    }

    #[test]
    fn test_permuted_input_gives_identical_result() {
        let forward = analyze(reference_records(), 10).unwrap();

        let mut rotated = reference_records();
        rotated.rotate_left(4);
        let mut reversed = reference_records();
        reversed.reverse();

        assert_eq!(analyze(rotated, 10).unwrap(), forward);
        assert_eq!(analyze(reversed, 10).unwrap(), forward);
    }

    #[tokio::test]
    async fn test_sharded_reference_scenario() {
        for shards in 1..=6 {
            let result = analyze_sharded(reference_records(), 10, shards).await.unwrap();
            assert_reference_result(&result);
        }
    }

    #[tokio::test]
    async fn test_sharded_with_huge_shard_count() {
        let result = analyze_sharded(reference_records(), 10, usize::MAX).await.unwrap();
        assert_reference_result(&result);
    }

    #[test]
    fn test_spend_overflow_fails_analysis() {
        let records = vec![
            RawRecord::new(2, "A", 10, 1, 1e308, 1).unwrap(),
            RawRecord::new(3, "A", 10, 1, 1e308, 1).unwrap(),
        ];

        let err = analyze(records, 10).unwrap_err();
        assert!(matches!(
            err,
            AnalyticsError::AggregateOverflow { ref campaign_id, field: "spend" } if campaign_id == "A"
        ));
    }

    #[tokio::test]
    async fn test_analyze_zip_reference_scenario() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ad_data.csv.zip");

        let mut zip = zip::ZipWriter::new(std::fs::File::create(&path).unwrap());
        zip.start_file("ad_data.csv", zip::write::FileOptions::default()).unwrap();
        zip.write_all(REFERENCE_CSV.as_bytes()).unwrap();
        zip.finish().unwrap();

        for shards in [1, 3] {
            let result = Analyzer::new(10)
                .with_shards(shards)
                .analyze_csv(&path)
                .await
                .unwrap();
            assert_reference_result(&result);
        }
    }

    #[test]
    fn test_zero_top_n_returns_empty_views() {
        let result = analyze(reference_records(), 0).unwrap();
        assert!(result.top_ctr.is_empty());
        assert!(result.top_cpa.is_empty());
    }

    #[test]
    fn test_single_eligible_entity() {
        let records = vec![
            RawRecord::new(2, "SOLO", 10, 2, 4.0, 2).unwrap(),
            RawRecord::new(3, "DARK", 0, 0, 1.0, 0).unwrap(),
        ];
        let result = analyze(records, 10).unwrap();

        assert_eq!(ids(&result.top_ctr), vec!["SOLO"]);
        assert_eq!(ids(&result.top_cpa), vec!["SOLO"]);
        assert_eq!(result.top_cpa[0].cpa, Some(2.0));
    }

    #[tokio::test]
    async fn test_malformed_row_fails_whole_analysis() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(
            &dir,
            "campaign_id,date,impressions,clicks,spend,conversions\n\
             CMP1,2023-01-01,1000,10,100.0,2\n\
             CMP2,2023-01-01,500,fifty,50.0,1\n",
        );

        for shards in [1, 4] {
            let err = Analyzer::new(10)
                .with_shards(shards)
                .analyze_csv(&path)
                .await
                .unwrap_err();

            match err {
                AnalyticsError::RecordParse { row, field, value } => {
                    assert_eq!(row, 3);
                    assert_eq!(field, "clicks");
                    assert_eq!(value, "fifty");
                }
                other => panic!("expected RecordParse, got {:?}", other),
            }
        }
    }

    #[tokio::test]
    async fn test_export_after_analysis() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(&dir, REFERENCE_CSV);
        let export_dir = dir.path().join("export");

        let result = Analyzer::default().analyze_csv(&path).await.unwrap();
        let mut writer = ReportWriter::new(ExportBackend::Csv, &export_dir, "20230101_000000").unwrap();
        writer.export(&result).await.unwrap();

        let top_cpa = std::fs::read_to_string(export_dir.join("top_cpa_20230101_000000.csv")).unwrap();
        let lines: Vec<&str> = top_cpa.lines().collect();

        assert_eq!(lines.len(), 4);
        assert_eq!(lines[1], "CMP1,2000,30,200.00,5,0.015000,40.00");
        assert_eq!(lines[2], "CMP4,4000,400,1000.00,25,0.100000,40.00");
        assert_eq!(lines[3], "CMP2,500,50,50.00,1,0.100000,50.00");

        let top_ctr = std::fs::read_to_string(export_dir.join("top_ctr_20230101_000000.csv")).unwrap();
        assert!(top_ctr.lines().any(|l| l == "CMP3,100,5,20.00,0,0.050000,"));
    }
}

//! End-to-end corpus analytics tests.
//!
//! Exercises the public API over caller-shaped corpora:
//! - classification code resolution cascade and determinism
//! - thematic clustering: partition invariant, degeneracy, ordering
//! - trend aggregation: window completeness, growth rates, rankings
//! - per-code drill-down and the chart-ready projection
//! - JSON shape of every report type

use chrono::NaiveDate;
use pretty_assertions::assert_eq;

use patent_analytics::{
    ipc, AnalyticsError, ClusteringEngine, GrowthRate, Period, TrendAnalyzer,
};
use patent_types::PatentRecord;

/// Helper: create a dated patent with the given attributes.
fn patent(
    id: &str,
    title: &str,
    abstract_text: &str,
    authors: &[&str],
    codes: &[&str],
    year: i32,
) -> PatentRecord {
    PatentRecord::new(id, title, abstract_text)
        .with_authors(authors.iter().map(|a| a.to_string()).collect())
        .with_ipc_codes(codes.iter().map(|c| c.to_string()).collect())
        .with_publication_date(NaiveDate::from_ymd_opt(year, 6, 15).unwrap())
}

/// Helper: nine patents across three clearly separated themes.
///
/// The three families share no content words, so their TF-IDF vectors
/// are mutually orthogonal and the expected partition is unambiguous.
fn themed_corpus() -> Vec<PatentRecord> {
    vec![
        // Neural networks (G06N3/02)
        patent(
            "RU2700001",
            "Нейронная сеть распознавания образов",
            "Глубокая нейронная сеть обучается распознаванию образов",
            &["Иванов И.И."],
            &["G06N3/02"],
            2022,
        ),
        patent(
            "RU2700002",
            "Сверточная нейронная сеть",
            "Сверточная нейронная сеть классифицирует образы обучающей выборки",
            &["Петров П.П."],
            &["G06N3/02"],
            2022,
        ),
        patent(
            "RU2700003",
            "Обучение нейронной сети",
            "Нейронная сеть проходит обучение распознаванию образов",
            &["Иванов И.И."],
            &["G06N3/02"],
            2023,
        ),
        // Hydraulic machinery (F16K1/00)
        patent(
            "RU2700004",
            "Гидравлический насос",
            "Гидравлический насос повышает давление рабочей жидкости",
            &["Сидоров С.С."],
            &["F16K1/00"],
            2021,
        ),
        patent(
            "RU2700005",
            "Гидравлический клапан",
            "Гидравлический клапан регулирует давление рабочей жидкости",
            &["Сидоров С.С."],
            &["F16K1/00"],
            2022,
        ),
        patent(
            "RU2700006",
            "Гидравлический привод",
            "Гидравлический привод передает давление рабочей жидкости",
            &["Кузнецов К.К."],
            &["F16K1/00"],
            2023,
        ),
        // Cardiac monitoring (A61B5/00)
        patent(
            "RU2700007",
            "Мониторинг сердечного ритма",
            "Прибор непрерывного мониторинга сердечного ритма пациента",
            &["Смирнов А.А."],
            &["A61B5/00"],
            2021,
        ),
        patent(
            "RU2700008",
            "Датчик мониторинга пациента",
            "Носимый датчик мониторинга сердечного ритма пациента",
            &["Смирнов А.А."],
            &["A61B5/00"],
            2022,
        ),
        patent(
            "RU2700009",
            "Электрокардиограф мониторинга ритма",
            "Портативный электрокардиограф мониторинга сердечного ритма пациента",
            &["Волков В.В."],
            &["A61B5/00"],
            2023,
        ),
    ]
}

/// Helper: ten patents spanning 2019-2023 for the trend scenarios.
///
/// Year distribution 1/2/2/2/3; `G06F` is the most frequent code
/// (5 of 10 records) and Иванов И.И. the most frequent author (4).
fn trend_corpus() -> Vec<PatentRecord> {
    vec![
        patent("RU001", "Обработка данных", "Система обработки данных", &["Иванов И.И."], &["G06F"], 2019),
        patent("RU002", "Хранение данных", "Распределенное хранение данных", &["Иванов И.И.", "Петров П.П."], &["G06F"], 2020),
        patent("RU003", "Передача пакетов", "Протокол передачи пакетов", &["Петров П.П."], &["H04L"], 2020),
        patent("RU004", "Параллельные вычисления", "Планировщик параллельных вычислений", &["Сидоров С.С."], &["G06F", "G06N3/02"], 2021),
        patent("RU005", "Маршрутизация", "Маршрутизация сетевого трафика", &["Иванов И.И."], &["H04L"], 2021),
        patent("RU006", "Кэширование", "Многоуровневое кэширование запросов", &["Кузнецов К.К."], &["G06F"], 2022),
        patent("RU007", "Шифрование каналов", "Шифрование каналов связи", &["Петров П.П."], &["H04L"], 2022),
        patent("RU008", "Индексирование", "Индексирование документов", &["Иванов И.И."], &["G06F"], 2023),
        patent("RU009", "Нейронные модели", "Обучение нейронных моделей", &["Смирнов А.А."], &["G06N3/02"], 2023),
        patent("RU010", "Кардиомонитор", "Носимый кардиомонитор", &["Кузнецов К.К."], &["A61B5/00"], 2023),
    ]
}

/// Resolution walks the prefix cascade and never varies between calls.
#[test]
fn test_resolver_cascade_and_determinism() {
    // 1. A full code resolves through its six-character prefix
    assert_eq!(
        ipc::resolve("G06F17/16").as_deref(),
        Some("Цифровые вычислительные машины или аналогичные устройства"),
        "G06F17/16 should resolve via the G06F17 prefix entry"
    );

    // 2. A code in an unknown section resolves to nothing
    assert_eq!(ipc::resolve("Z99"), None, "Section Z is not tabled");

    // 3. A known section letter labels codes its tables do not cover
    assert_eq!(
        ipc::resolve("G99X7/77").as_deref(),
        Some("Физика (G99X7/77)"),
        "Unmatched physics codes should fall back to the section label"
    );

    // 4. Resolution is a pure function of its input
    for code in ["G06F17/16", "A61K31/00", "Z99", "h04l 12/28"] {
        assert_eq!(
            ipc::resolve(code),
            ipc::resolve(code),
            "resolve must be deterministic for {code}"
        );
    }
}

/// Clusters partition the corpus: every record in exactly one cluster.
#[test]
fn test_clustering_partitions_corpus_exactly_once() {
    // 1. Cluster the three-theme corpus with a generous hint
    let corpus = themed_corpus();
    let clusters = ClusteringEngine::default()
        .cluster(&corpus, 10)
        .expect("clustering failed");

    // 2. The union of members is the input corpus, each record once
    let mut seen: Vec<&str> = clusters
        .iter()
        .flat_map(|cluster| cluster.members.iter().map(|member| member.id.as_str()))
        .collect();
    seen.sort_unstable();
    let mut expected: Vec<&str> = corpus.iter().map(|record| record.id.as_str()).collect();
    expected.sort_unstable();
    assert_eq!(seen, expected, "clusters must cover the corpus without duplicates");

    // 3. No empty clusters are returned
    assert!(
        clusters.iter().all(|cluster| !cluster.members.is_empty()),
        "no cluster may be empty"
    );

    // 4. Clusters are ordered by member count, largest first
    for pair in clusters.windows(2) {
        assert!(
            pair[0].members.len() >= pair[1].members.len(),
            "clusters must be ordered by descending size"
        );
    }
}

/// Three orthogonal themes separate into three labeled clusters.
#[test]
fn test_clustering_labels_themes_from_classification_codes() {
    // 1. Nine records, three per theme; k = floor(sqrt(9)) = 3
    let corpus = themed_corpus();
    let clusters = ClusteringEngine::default()
        .cluster(&corpus, 5)
        .expect("clustering failed");

    assert_eq!(clusters.len(), 3, "three disjoint themes should yield three clusters");

    // 2. Equal member counts, so ordering falls back to theme ascending
    let themes: Vec<&str> = clusters.iter().map(|cluster| cluster.theme.as_str()).collect();
    assert_eq!(
        themes,
        vec![
            "Вычислительные системы, основанные на моделях нейронных сетей",
            "Диагностика; хирургия; опознание личности",
            "Узлы и детали машин",
        ],
        "themes should come from resolved codes, tied sizes ordered by theme"
    );

    // 3. Members stay with their thematic family
    for cluster in &clusters {
        let first_code = &cluster.members[0].ipc_codes[0];
        assert!(
            cluster.members.iter().all(|member| &member.ipc_codes[0] == first_code),
            "cluster {:?} mixes thematic families",
            cluster.theme
        );
    }

    // 4. Tight clusters report high cohesion
    for cluster in &clusters {
        let cohesion = cluster.cohesion.expect("text-bearing clusters have cohesion");
        assert!(cohesion > 0.5, "cohesion {cohesion} too low for a tight theme");
    }
}

/// A single-record corpus degrades to one single-member cluster.
#[test]
fn test_single_patent_corpus_yields_single_cluster() {
    let corpus = vec![patent(
        "RU1",
        "Нейронная сеть",
        "Способ обучения нейронной сети",
        &["Иванов И.И."],
        &["G06N3/02"],
        2023,
    )];
    let clusters = ClusteringEngine::default()
        .cluster(&corpus, 5)
        .expect("single-record clustering failed");

    assert_eq!(clusters.len(), 1, "one record means exactly one cluster");
    assert_eq!(clusters[0].members.len(), 1);
    assert_eq!(clusters[0].members[0].id, "RU1");
}

/// Clustering refuses an empty corpus; aggregation degrades instead.
#[test]
fn test_empty_corpus_handling_differs_by_operation() {
    // 1. Clustering an empty corpus is an explicit error
    let result = ClusteringEngine::default().cluster(&[], 5);
    assert!(
        matches!(result, Err(AnalyticsError::EmptyCorpus)),
        "clustering must signal the empty corpus"
    );

    // 2. Aggregation returns a degenerate zero report instead
    let report = TrendAnalyzer::default()
        .aggregate(&[], 5)
        .expect("empty corpus must aggregate to a degenerate report");
    assert_eq!(report.total_patents, 0);
    assert_eq!(report.analyzed_patents, 0);
    assert_eq!(report.yearly_statistics.len(), 5);
    assert!(report.yearly_statistics.values().all(|&count| count == 0));
    assert_eq!(report.growth_rate, GrowthRate::InsufficientData);
    assert!(report.top_authors.is_empty());
    assert!(report.top_ipc_codes.is_empty());
}

/// A five-year window always materializes exactly five years.
#[test]
fn test_five_year_window_is_gap_free() {
    // Records only at the window edges; interior years must appear as zeros
    let corpus = vec![
        patent("RU1", "t", "a", &[], &["G06F"], 2019),
        patent("RU2", "t", "a", &[], &["G06F"], 2023),
        patent("RU3", "t", "a", &[], &["H04L"], 2023),
    ];
    let report = TrendAnalyzer::default()
        .aggregate(&corpus, 5)
        .expect("aggregation failed");

    let years: Vec<i32> = report.yearly_statistics.keys().copied().collect();
    assert_eq!(years, vec![2019, 2020, 2021, 2022, 2023], "window must have no gaps");
    assert_eq!(report.yearly_statistics[&2020], 0);
    assert_eq!(report.yearly_statistics[&2021], 0);
    assert_eq!(report.yearly_statistics[&2022], 0);
    assert_eq!(report.yearly_statistics.values().sum::<u64>(), 3);
}

/// One active year cannot anchor a growth comparison.
#[test]
fn test_single_active_year_has_insufficient_growth_data() {
    let corpus = vec![
        patent("RU1", "t", "a", &[], &["G06F"], 2023),
        patent("RU2", "t", "a", &[], &["G06F"], 2023),
        patent("RU3", "t", "a", &[], &["H04L"], 2023),
    ];
    let report = TrendAnalyzer::default()
        .aggregate(&corpus, 5)
        .expect("aggregation failed");

    assert_eq!(
        report.growth_rate,
        GrowthRate::InsufficientData,
        "a single non-zero year must not fabricate a growth rate"
    );
}

/// Authors with equal counts rank in ascending alphabetical order.
#[test]
fn test_tied_authors_rank_alphabetically() {
    let corpus = vec![
        patent("RU1", "t", "a", &["Борисов Б.Б."], &["G06F"], 2022),
        patent("RU2", "t", "a", &["Антонов А.А."], &["G06F"], 2022),
        patent("RU3", "t", "a", &["Борисов Б.Б.", "Антонов А.А."], &["G06F"], 2023),
    ];
    let report = TrendAnalyzer::default()
        .aggregate(&corpus, 2)
        .expect("aggregation failed");

    assert_eq!(report.top_authors.len(), 2);
    assert_eq!(report.top_authors[0].count, report.top_authors[1].count);
    assert_eq!(
        report.top_authors[0].author, "Антонов А.А.",
        "equal counts must order alphabetically"
    );
    assert_eq!(report.top_authors[1].author, "Борисов Б.Б.");
}

/// The ten-patent 2019-2023 scenario checks the whole report at once.
#[test]
fn test_ten_patent_trend_scenario_end_to_end() {
    // 1. Aggregate over a five-year period
    let corpus = trend_corpus();
    let report = TrendAnalyzer::default()
        .aggregate(&corpus, 5)
        .expect("aggregation failed");

    // 2. The window anchors on the latest publication year
    assert_eq!(report.period, Period::new(2019, 2023));
    assert_eq!(report.total_patents, 10);
    assert_eq!(report.analyzed_patents, 10);

    // 3. Yearly counts cover the window and sum to the corpus size
    assert_eq!(report.yearly_statistics.len(), 5);
    assert_eq!(report.yearly_statistics.values().sum::<u64>(), 10);
    assert_eq!(report.yearly_statistics[&2019], 1);
    assert_eq!(report.yearly_statistics[&2023], 3);

    // 4. G06F leads the code ranking and carries its description
    assert_eq!(report.top_ipc_codes[0].ipc_code, "G06F");
    assert_eq!(report.top_ipc_codes[0].count, 5);
    assert_eq!(
        report.top_ipc_codes[0].description.as_deref(),
        Some("Обработка цифровых данных с помощью электрических устройств")
    );

    // 5. The most active author leads the author ranking
    assert_eq!(report.top_authors[0].author, "Иванов И.И.");
    assert_eq!(report.top_authors[0].count, 4);

    // 6. Growth compares the endpoint years: 2019 has 1, 2023 has 3
    assert_eq!(report.growth_rate, GrowthRate::Percent(200.0));
}

/// Per-code drill-down matches prefixes and summarizes the window.
#[test]
fn test_per_code_report_covers_prefix_matches() {
    // 1. Query the bare subclass; full codes must match by prefix
    let corpus = trend_corpus();
    let report = TrendAnalyzer::default()
        .aggregate_by_code(&corpus, "G06F", 5)
        .expect("per-code aggregation failed");

    // 2. Five records carry G06F, one per window year
    assert_eq!(report.ipc_code, "G06F");
    assert_eq!(report.total_patents, 5);
    assert_eq!(report.period, Period::new(2019, 2023));
    assert!(report.yearly_statistics.values().all(|&count| count == 1));

    // 3. Average per window year and flat growth
    assert_eq!(report.avg_per_year, 1.0);
    assert_eq!(report.growth_rate, GrowthRate::Percent(0.0));

    // 4. Recent patents cover the trailing three years, newest first
    let recent: Vec<&str> = report
        .recent_patents
        .iter()
        .map(|patent| patent.id.as_str())
        .collect();
    assert_eq!(recent, vec!["RU008", "RU006", "RU004"]);

    // 5. An unmatched code zero-fills instead of failing
    let missing = TrendAnalyzer::default()
        .aggregate_by_code(&corpus, "C12N", 5)
        .expect("unmatched code must still produce a report");
    assert_eq!(missing.total_patents, 0);
    assert_eq!(missing.growth_rate, GrowthRate::InsufficientData);
    assert!(missing.recent_patents.is_empty());
}

/// The chart projection reshapes the report without re-sorting it.
#[test]
fn test_chart_projection_is_ready_to_render() {
    let corpus = trend_corpus();
    let analyzer = TrendAnalyzer::default();
    let report = analyzer.aggregate(&corpus, 5).expect("aggregation failed");
    let chart = analyzer.chart_data(&report);

    // 1. Line chart arrays align with the window years
    assert_eq!(chart.line_chart.years, vec![2019, 2020, 2021, 2022, 2023]);
    assert_eq!(chart.line_chart.patents_count, vec![1, 2, 2, 2, 3]);

    // 2. Pie slices follow the report ranking order exactly
    let pie: Vec<&str> = chart
        .pie_chart
        .iter()
        .map(|slice| slice.ipc_code.as_str())
        .collect();
    let ranked: Vec<&str> = report
        .top_ipc_codes
        .iter()
        .take(pie.len())
        .map(|entry| entry.ipc_code.as_str())
        .collect();
    assert_eq!(pie, ranked, "pie slices must not re-sort the ranking");

    // 3. The summary carries the headline figures
    assert_eq!(chart.trends_summary.top_ipc_code.as_deref(), Some("G06F"));
    assert_eq!(
        chart.trends_summary.most_active_author.as_deref(),
        Some("Иванов И.И.")
    );
    assert_eq!(chart.trends_summary.total_growth_rate, report.growth_rate);
}

/// Neighbor lookup ranks in-theme records above unrelated ones.
#[test]
fn test_similar_patent_lookup() {
    let corpus = themed_corpus();
    let similar = ClusteringEngine::default()
        .find_similar(&corpus, "RU2700001", 8)
        .expect("similarity lookup failed");

    // 1. Every other record is ranked, capped by the limit
    assert_eq!(similar.len(), 8);

    // 2. The two other neural patents outrank all unrelated ones
    let top_two: Vec<&str> = similar[..2].iter().map(|s| s.patent.id.as_str()).collect();
    assert!(top_two.contains(&"RU2700002"), "neural twin should rank first or second");
    assert!(top_two.contains(&"RU2700003"), "neural twin should rank first or second");
    assert!(similar[0].similarity > 0.0);

    // 3. Disjoint-vocabulary records have no similarity at all
    assert_eq!(similar[7].similarity, 0.0);

    // 4. Unknown targets are an explicit error
    let missing = ClusteringEngine::default().find_similar(&corpus, "RU999", 5);
    assert!(matches!(missing, Err(AnalyticsError::PatentNotFound(id)) if id == "RU999"));
}

/// Every report type serializes to the plain JSON the web layer expects.
#[test]
fn test_reports_serialize_to_plain_json() {
    let corpus = trend_corpus();
    let analyzer = TrendAnalyzer::default();

    // 1. Trend report: numeric growth, quoted-year map keys
    let report = analyzer.aggregate(&corpus, 5).expect("aggregation failed");
    let json = serde_json::to_value(&report).expect("report must serialize");
    assert_eq!(json["period"]["start_year"], 2019);
    assert_eq!(json["period"]["end_year"], 2023);
    assert_eq!(json["total_patents"], 10);
    assert_eq!(json["yearly_statistics"]["2023"], 3);
    assert_eq!(json["growth_rate"], 200.0);
    assert_eq!(json["top_ipc_codes"][0]["ipc_code"], "G06F");

    // 2. Insufficient data serializes as the marker string
    let empty = analyzer
        .aggregate_at(&[], 5, 2023)
        .expect("degenerate aggregation failed");
    let json = serde_json::to_value(&empty).expect("degenerate report must serialize");
    assert_eq!(json["growth_rate"], "insufficient data");

    // 3. Per-code report carries its resolved description
    let by_code = analyzer
        .aggregate_by_code(&corpus, "G06F", 5)
        .expect("per-code aggregation failed");
    let json = serde_json::to_value(&by_code).expect("per-code report must serialize");
    assert_eq!(json["ipc_code"], "G06F");
    assert_eq!(json["avg_per_year"], 1.0);
    assert_eq!(json["recent_patents"][0]["id"], "RU008");

    // 4. Clusters serialize with theme and full member records
    let clusters = ClusteringEngine::default()
        .cluster(&corpus, 3)
        .expect("clustering failed");
    let json = serde_json::to_value(&clusters).expect("clusters must serialize");
    let array = json.as_array().expect("clusters serialize as an array");
    assert!(!array.is_empty());
    assert!(array[0]["theme"].is_string());
    assert!(array[0]["members"][0]["id"].is_string());
    assert!(array[0]["members"][0]["abstract"].is_string());
}

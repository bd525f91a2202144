mod common;

use common::{make_result, FailingLLM, ScriptedLLM};
use dossier_core::config::{CallPolicy, SynthesisConfig};
use dossier_core::llm::MockLLM;
use dossier_core::research::{BriefAssembler, SynthesisError, SynthesisStage};
use dossier_core::search::MockSearch;
use dossier_core::{ResultRecord, Task, TaskEvidence};

fn distinct_records(prefix: &str, count: usize) -> Vec<ResultRecord> {
    let titles = ["alpha", "bravo", "charlie", "delta", "echo", "foxtrot", "golf", "hotel"];
    let notes = ["india", "juliet", "kilo", "lima", "mike", "november", "oscar", "papa"];
    (0..count)
        .map(|i| {
            make_result(
                &format!("https://{prefix}.example.net/{i}"),
                &format!("{} {prefix} report", titles[i]),
                &format!("{} notes", notes[i]),
            )
            .with_source_rank(i as u32 + 1)
        })
        .collect()
}

fn scripted(summary: &str) -> ScriptedLLM {
    ScriptedLLM {
        summary: summary.to_string(),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_single_task_offline_brief() {
    let query = "What is the capital of France?";
    let results = MockSearch::new().results(query, 5);
    let evidence = vec![TaskEvidence::new(Task::numbered(0, query), results)];

    let assembler = BriefAssembler::new(MockLLM::new()).with_policy(CallPolicy::unbounded());
    let brief = assembler.assemble(query, &evidence).await.unwrap();

    assert_eq!(brief.query, query);
    assert_eq!(brief.sections.len(), 1);
    assert_eq!(brief.sections[0].order, 1);
    assert_eq!(brief.sections[0].task_id, "t1");
    assert!(!brief.citations.is_empty());
    assert!(brief.citations.len() <= 5);
    assert!(!brief.conclusion.is_empty());
    assert!(brief.conclusion.chars().count() <= 800);
    assert!(brief.claims.is_none());
}

#[tokio::test]
async fn test_shared_url_gets_one_citation() {
    let shared = make_result("https://shared.org/paper", "Shared paper", "common ground findings");
    let mut first = distinct_records("one", 2);
    first.push(shared.clone());
    let mut second = distinct_records("two", 2);
    second.insert(0, shared.clone());

    let evidence = vec![
        TaskEvidence::new(Task::numbered(0, "first question"), first),
        TaskEvidence::new(Task::numbered(1, "second question"), second),
    ];
    let llm = ScriptedLLM::default();
    let brief = BriefAssembler::new(&llm)
        .assemble("shared question", &evidence)
        .await
        .unwrap();

    let shared_entries: Vec<_> = brief
        .citations
        .iter()
        .filter(|c| c.url == shared.url)
        .collect();
    assert_eq!(shared_entries.len(), 1);
    assert_eq!(brief.citations.len(), 5);

    let marker = format!("(cite:{})", shared_entries[0].id);
    for section in &brief.sections {
        assert!(
            section.bullets.iter().any(|b| b.contains(&marker)),
            "section {} does not cite the shared source",
            section.task_id
        );
    }
}

#[tokio::test]
async fn test_citation_ids_follow_task_order() {
    let evidence = vec![
        TaskEvidence::new(Task::numbered(0, "first"), distinct_records("one", 3)),
        TaskEvidence::new(Task::numbered(1, "second"), distinct_records("two", 3)),
    ];
    let llm = ScriptedLLM::default();
    let brief = BriefAssembler::new(&llm).assemble("q", &evidence).await.unwrap();

    let ids: Vec<usize> = brief.citations.iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![1, 2, 3, 4, 5, 6]);
    assert!(brief.citations[..3].iter().all(|c| c.url.contains("one.example.net")));
    assert!(brief.citations[3..].iter().all(|c| c.url.contains("two.example.net")));
}

#[tokio::test]
async fn test_identical_input_gives_identical_citations() {
    let evidence = vec![
        TaskEvidence::new(Task::numbered(0, "first"), distinct_records("one", 4)),
        TaskEvidence::new(Task::numbered(1, "second"), distinct_records("two", 4)),
    ];
    let llm = ScriptedLLM::default();
    let assembler = BriefAssembler::new(&llm);
    let a = assembler.assemble("alpha report", &evidence).await.unwrap();
    let b = assembler.assemble("alpha report", &evidence).await.unwrap();
    assert_eq!(a.citations, b.citations);
}

#[tokio::test]
async fn test_only_leading_evidence_is_considered() {
    let evidence = vec![TaskEvidence::new(
        Task::numbered(0, "first"),
        distinct_records("one", 8),
    )];
    let llm = ScriptedLLM::default();
    let brief = BriefAssembler::new(&llm).assemble("q", &evidence).await.unwrap();

    assert_eq!(brief.citations.len(), 5);
    assert!(brief
        .citations
        .iter()
        .all(|c| !c.url.ends_with("/5") && !c.url.ends_with("/6") && !c.url.ends_with("/7")));
    assert_eq!(brief.sections[0].bullets.len(), 3);
}

#[tokio::test]
async fn test_bullet_format_truncates_snippet() {
    let long_snippet = "x".repeat(500);
    let record = make_result("https://a.org/1", "Long read", &long_snippet);
    let evidence = vec![TaskEvidence::new(Task::numbered(0, "first"), vec![record])];
    let llm = ScriptedLLM::default();
    let brief = BriefAssembler::new(&llm).assemble("q", &evidence).await.unwrap();

    let expected = format!("Long read (cite:1) — {}", "x".repeat(240));
    assert_eq!(brief.sections[0].bullets, vec![expected]);
}

#[tokio::test]
async fn test_summary_is_truncated_and_caveats_flagged() {
    let summary = format!("Findings are uncertain. {}", "y".repeat(2000));
    let llm = scripted(&summary);
    let evidence = vec![
        TaskEvidence::new(Task::numbered(0, "first"), distinct_records("one", 2)),
        TaskEvidence::new(Task::numbered(1, "second"), distinct_records("two", 2)),
    ];
    let brief = BriefAssembler::new(&llm).assemble("q", &evidence).await.unwrap();

    assert_eq!(brief.sections[0].content.chars().count(), 1200);
    assert_eq!(
        brief.contradictions_and_uncertainties,
        vec![
            "Task t1: possible contradictions or uncertainties noted.".to_string(),
            "Task t2: possible contradictions or uncertainties noted.".to_string(),
        ]
    );
}

#[tokio::test]
async fn test_no_caveats_when_summary_is_clean() {
    let llm = scripted("All sources agree.");
    let evidence = vec![TaskEvidence::new(Task::numbered(0, "first"), distinct_records("one", 2))];
    let brief = BriefAssembler::new(&llm).assemble("q", &evidence).await.unwrap();
    assert!(brief.contradictions_and_uncertainties.is_empty());
}

#[tokio::test]
async fn test_conclusion_trimmed_and_truncated() {
    let llm = ScriptedLLM {
        conclusion: format!("   {}   ", "z".repeat(1000)),
        ..Default::default()
    };
    let evidence = vec![TaskEvidence::new(Task::numbered(0, "first"), distinct_records("one", 1))];
    let brief = BriefAssembler::new(&llm).assemble("q", &evidence).await.unwrap();
    assert_eq!(brief.conclusion, "z".repeat(800));

    let llm = ScriptedLLM::default();
    let brief = BriefAssembler::new(&llm).assemble("q", &evidence).await.unwrap();
    assert_eq!(brief.conclusion, "The evidence points one way.");
}

#[tokio::test]
async fn test_synthesis_prompt_carries_summaries() {
    let llm = scripted("distinctive summary text");
    let evidence = vec![TaskEvidence::new(Task::numbered(0, "the sub question"), distinct_records("one", 2))];
    BriefAssembler::new(&llm).assemble("q", &evidence).await.unwrap();

    let prompts = llm.prompts();
    let synthesis = prompts
        .iter()
        .find(|p| p.starts_with("## Task-level summaries"))
        .unwrap();
    assert!(synthesis.contains("### 1. the sub question\ndistinctive summary text"));
    assert_eq!(llm.count_starting_with("Summarize"), 1);
}

#[tokio::test]
async fn test_summary_failure_aborts_without_synthesis() {
    let llm = ScriptedLLM {
        fail_on: Some("second question".to_string()),
        ..Default::default()
    };
    let evidence = vec![
        TaskEvidence::new(Task::numbered(0, "first question"), distinct_records("one", 2)),
        TaskEvidence::new(Task::numbered(1, "second question"), distinct_records("two", 2)),
    ];
    let err = BriefAssembler::new(&llm)
        .assemble("q", &evidence)
        .await
        .unwrap_err();

    assert!(matches!(
        &err,
        SynthesisError::Generation { stage: SynthesisStage::TaskSummary(id), .. } if id == "t2"
    ));
    assert_eq!(llm.count_starting_with("## Task-level summaries"), 0);
}

#[tokio::test]
async fn test_synthesis_failure_names_stage() {
    let llm = ScriptedLLM {
        fail_on: Some("Task-level summaries".to_string()),
        ..Default::default()
    };
    let evidence = vec![TaskEvidence::new(Task::numbered(0, "first"), distinct_records("one", 2))];
    let err = BriefAssembler::new(&llm).assemble("q", &evidence).await.unwrap_err();
    assert_eq!(err.stage(), &SynthesisStage::FinalSynthesis);
}

#[tokio::test]
async fn test_failing_generator_yields_no_brief() {
    let evidence = vec![TaskEvidence::new(Task::numbered(0, "first"), distinct_records("one", 2))];
    let result = BriefAssembler::new(FailingLLM).assemble("q", &evidence).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_claims_classified_when_enabled() {
    let llm = ScriptedLLM {
        label: "OPINION".to_string(),
        ..Default::default()
    };
    let records = vec![
        make_result("https://a.org/1", "Trial of 300 patients", "results published"),
        make_result("https://b.org/2", "Critics argue otherwise", "skeptical voices"),
        make_result("https://c.org/3", "Vague commentary", "nothing concrete here"),
    ];
    let evidence = vec![TaskEvidence::new(Task::numbered(0, "first"), records)];
    let config = SynthesisConfig {
        classify_claims: true,
        ..Default::default()
    };
    let brief = BriefAssembler::new(&llm)
        .with_synthesis(config)
        .assemble("q", &evidence)
        .await
        .unwrap();

    let claims = brief.claims.unwrap();
    assert_eq!(claims.facts.len(), 1);
    assert_eq!(claims.facts[0].url, "https://a.org/1");
    assert_eq!(claims.facts[0].claim, "Trial of 300 patients. results published");
    assert_eq!(claims.opinions.len(), 2);
    assert_eq!(llm.count_starting_with("Classify"), 1);
}

#[tokio::test]
async fn test_empty_task_list_still_concludes() {
    let llm = ScriptedLLM::default();
    let brief = BriefAssembler::new(&llm).assemble("q", &[]).await.unwrap();
    assert!(brief.sections.is_empty());
    assert!(brief.citations.is_empty());
    assert!(!brief.conclusion.is_empty());
}

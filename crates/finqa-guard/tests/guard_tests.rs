use finqa_guard::{harmful_keyword, Guardrails, Rejection, StatementType, FLAGGED_ANSWER};

#[test]
fn screens_questions_in_order() {
    let guard = Guardrails::new().unwrap();
    assert_eq!(guard.screen_query("   "), Err(Rejection::Empty));
    assert_eq!(guard.screen_query("I want to bomb the building"), Err(Rejection::Harmful { keyword: "bomb" }));
    assert_eq!(guard.screen_query("What's the weather today?"), Err(Rejection::OffTopic));
    assert_eq!(guard.screen_query("What is the total revenue for 2023?"), Ok(StatementType::IncomeStatement));
}

#[test]
fn harmful_wins_over_financial_vocabulary() {
    let guard = Guardrails::new().unwrap();
    let rejected = guard.screen_query("How much illegal revenue was booked?").unwrap_err();
    assert_eq!(rejected, Rejection::Harmful { keyword: "illegal" });
    assert_eq!(rejected.to_string(), "This question can't be answered because it contains prohibited content.");
}

#[test]
fn harmful_keywords_match_inside_words() {
    assert_eq!(harmful_keyword("Who is BOMBING the market"), Some("bomb"));
    assert_eq!(harmful_keyword("net income in 2024"), None);
}

#[test]
fn rejection_messages() {
    assert_eq!(Rejection::Empty.message(), "Please enter a query.");
    assert_eq!(Rejection::OffTopic.message(), "Please ask a finance question.");
}

#[test]
fn flags_placeholder_answers() {
    let guard = Guardrails::new().unwrap();

    let flagged = guard.screen_answer("The revenue is ??? for 2023");
    assert!(flagged.flagged);
    assert_eq!(flagged.text, FLAGGED_ANSWER);

    assert!(guard.screen_answer("NaN").flagged);
    assert!(guard.screen_answer("value is undefined").flagged);
    assert!(guard.screen_answer("No data available").flagged);

    let clean = guard.screen_answer("Revenue: 50000");
    assert!(!clean.flagged);
    assert_eq!(clean.text, "Revenue: 50000");
}

#[test]
fn placeholder_words_do_not_fire_inside_other_words() {
    let guard = Guardrails::new().unwrap();
    assert!(!guard.screen_answer("Financial revenue was 383285000000.0").flagged);
}

#[test]
fn placeholder_substrings_are_flagged() {
    let guard = Guardrails::new().unwrap();
    let flagged = guard.screen_answer("Total Revenue: undefined_value");
    assert!(flagged.flagged);
    assert_eq!(flagged.text, FLAGGED_ANSWER);
    assert!(guard.screen_answer("no datapoints for 2023").flagged);
    assert!(guard.screen_answer("x???y").flagged);
    assert!(guard.screen_answer("Value: NaN%?").flagged);
}

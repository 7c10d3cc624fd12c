use super::*;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use client_core::{FormSource, TransportError};
use shared::{
    domain::Combination,
    protocol::{FilterMatches, FilterOutcome, FilterRequest},
};

use crate::terminal::TerminalSurface;

#[derive(Default, Clone)]
struct CountingService {
    requests: Arc<Mutex<Vec<FilterRequest>>>,
}

#[async_trait]
impl FilterService for CountingService {
    async fn submit(&self, request: &FilterRequest) -> Result<FilterOutcome, TransportError> {
        self.requests.lock().expect("lock").push(request.clone());
        Ok(FilterOutcome::Matched(FilterMatches {
            combinations: vec![
                Combination(vec![1, 2, 3]),
                Combination(vec![1, 2, 4]),
                Combination(vec![1, 3, 4]),
            ],
            total: 3,
        }))
    }
}

#[test]
fn parses_set_with_multi_word_values() {
    assert_eq!(
        parse_line("set include_numbers 1, 2, 3"),
        Ok(ReplCommand::Set {
            field: Field::IncludeNumbers,
            value: "1, 2, 3".into()
        })
    );
}

#[test]
fn parses_bare_commands_case_insensitively() {
    assert_eq!(parse_line("  Generate "), Ok(ReplCommand::Generate));
    assert_eq!(parse_line("exit"), Ok(ReplCommand::Quit));
    assert_eq!(parse_line(""), Ok(ReplCommand::Empty));
    assert_eq!(
        parse_line("filter even_odd"),
        Ok(ReplCommand::Filter("even_odd".into()))
    );
}

#[test]
fn reports_usage_and_unknown_input() {
    assert_eq!(
        parse_line("set total_numbers"),
        Err(ReplParseError::Usage("set <field> <value>"))
    );
    assert_eq!(parse_line("filter"), Err(ReplParseError::Usage("filter <kind>")));
    assert!(matches!(
        parse_line("set colour blue"),
        Err(ReplParseError::UnknownField(_))
    ));
    assert_eq!(
        parse_line("launch"),
        Err(ReplParseError::UnknownCommand("launch".into()))
    );
}

#[tokio::test]
async fn session_keeps_form_and_survives_errors() {
    let service = CountingService::default();
    let requests = Arc::clone(&service.requests);
    let coordinator = RequestCoordinator::new(service);
    let surface = TerminalSurface::new(Vec::new(), Vec::new());
    let mut out = Vec::new();
    let script = "\
set total_numbers 11
set choose 6
generate
set random_count 0
filter random
filter median
bogus
set random_count 2
filter random
current
quit
generate
";

    let mut session = ReplSession::default();
    session
        .run(&coordinator, &surface, script.as_bytes(), &mut out)
        .await
        .expect("session");

    let requests = requests.lock().expect("lock").clone();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0], FilterRequest::unfiltered(11, 6));
    assert_eq!(requests[1].total_numbers, 11);

    let (results, alerts) = surface.into_inner();
    let results = String::from_utf8(results).expect("utf8");
    let alerts = String::from_utf8(alerts).expect("utf8");
    assert!(results.contains("Found 3 combinations"));
    assert!(alerts.contains("Please enter a valid number of combinations"));
    assert!(alerts.contains("Unknown filter kind: median"));
    assert!(alerts.contains("unknown command 'bogus'"));

    let out = String::from_utf8(out).expect("utf8");
    assert!(out.starts_with("3 combinations held\n1, 2, 3\n"));
    assert_eq!(session.form().value(Field::RandomCount).as_deref(), Some("2"));
}

#[tokio::test]
async fn fields_and_unset_reflect_the_form() {
    let coordinator = RequestCoordinator::new(CountingService::default());
    let surface = TerminalSurface::new(Vec::new(), Vec::new());
    let mut out = Vec::new();
    let mut session = ReplSession::new(FormState::new().with(Field::Choose, "6"));

    for line in ["set min_sum 21", "unset choose", "fields"] {
        let command = parse_line(line).expect("parse");
        assert_eq!(
            session
                .execute(command, &coordinator, &surface, &mut out)
                .await
                .expect("execute"),
            Flow::Continue
        );
    }

    assert_eq!(String::from_utf8(out).expect("utf8"), "min_sum = 21\n");
}

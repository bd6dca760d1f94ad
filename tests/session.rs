#[cfg(test)]
mod tests {
    use brainclock::libs::session::{SessionError, SessionState, SessionStore};
    use brainclock::libs::user::{parse_iaf, IafError};

    #[test]
    fn test_session_created_on_first_contact() {
        let sessions = SessionStore::new();
        assert!(sessions.is_empty());
        assert_eq!(sessions.get(1), None);
        assert_eq!(sessions.get_or_create(1), SessionState::Welcome);
        assert_eq!(sessions.len(), 1);
    }

    #[test]
    fn test_happy_path() {
        let sessions = SessionStore::new();
        assert_eq!(sessions.start(7), SessionState::Welcome);
        assert_eq!(sessions.request_iaf(7), SessionState::WaitingIaf);
        assert_eq!(sessions.accept_iaf(7), Ok(SessionState::ReadyForFile));
        assert_eq!(sessions.request_file(7), SessionState::WaitingFile);
        assert_eq!(sessions.accept_file(7), Ok(SessionState::WaitingFile));
        assert_eq!(sessions.complete_analysis(7), SessionState::AnalysisComplete);
    }

    #[test]
    fn test_invalid_transitions() {
        let sessions = SessionStore::new();
        sessions.start(1);
        assert_eq!(
            sessions.accept_iaf(1),
            Err(SessionError::InvalidTransition {
                action: "accept IAF",
                state: SessionState::Welcome
            })
        );
        assert!(sessions.accept_file(1).is_err());
        assert_eq!(sessions.get(1), Some(SessionState::Welcome));
    }

    #[test]
    fn test_reset_clears_session() {
        let sessions = SessionStore::new();
        sessions.start(1);
        sessions.start(2);
        sessions.reset(1);
        assert_eq!(sessions.get(1), None);
        assert_eq!(sessions.get(2), Some(SessionState::Welcome));
    }

    #[test]
    fn test_parse_iaf() {
        assert_eq!(parse_iaf("10"), Ok(10.0));
        assert_eq!(parse_iaf(" 10,5 "), Ok(10.5));
        assert_eq!(parse_iaf("7"), Ok(7.0));
        assert_eq!(parse_iaf("14.0"), Ok(14.0));
        assert_eq!(parse_iaf("6.9"), Err(IafError::OutOfRange(6.9)));
        assert_eq!(parse_iaf("14.1"), Err(IafError::OutOfRange(14.1)));
        assert_eq!(parse_iaf("ten"), Err(IafError::NotANumber("ten".into())));
    }
}

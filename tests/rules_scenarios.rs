use checkers_web_app::game::movegen::captures_from;
use checkers_web_app::game::{
    execute_move, moves_for, obligatory_captures, Board, GameSession, Move, Piece, Position,
    RuleError, Side, Transition, TurnPhase,
};
use checkers_web_app::models::utils::get_game_status;
use checkers_web_app::models::GameStatus;
use checkers_web_app::store::{GameStore, Seat};

fn pos(row: usize, col: usize) -> Position {
    Position::new(row, col).unwrap()
}

fn board(diagram: &str) -> Board {
    diagram.parse().unwrap()
}

fn red_session(b: Board) -> GameSession {
    GameSession::new(b, Side::Red, Some(Side::Red), false)
}

#[test]
fn opening_step_passes_the_turn() {
    let mut session = red_session(Board::initial());
    match session.apply_move(pos(5, 0), pos(4, 1)).unwrap() {
        Transition::TurnComplete {
            board,
            side_to_move,
            winner,
        } => {
            assert_eq!(side_to_move, Side::Black);
            assert_eq!(winner, None);
            assert_eq!(board.get(pos(4, 1)), Some(Piece::man(Side::Red)));
            assert!(board.is_empty_at(pos(5, 0)));
        }
        other => panic!("expected a completed turn, got {other:?}"),
    }
    assert_eq!(session.side_to_move(), Side::Black);
    assert_eq!(session.phase(), TurnPhase::Idle);
}

#[test]
fn capture_toward_the_edge_is_not_generated() {
    let b = board(
        "
        ........
        b.......
        .r......
        ........
        ........
        ........
        ........
        ......b.
        ",
    );
    let moves = moves_for(pos(2, 1), Side::Red, false, &b);
    assert!(moves.iter().all(|m| !m.is_capture()));
    assert!(obligatory_captures(Side::Red, &b).is_empty());
}

#[test]
fn promotion_ends_the_capture_chain() {
    // After landing on (0,1) as a king, the black man on (4,5) would be
    // capturable along the diagonal just vacated.
    let b = board(
        "
        ........
        ..b.....
        ...r....
        ........
        .....b..
        ........
        ........
        ........
        ",
    );
    let jump = Move::jump(pos(2, 3), pos(0, 1), pos(1, 2));
    let outcome = execute_move(&b, &jump).unwrap();
    assert!(outcome.promoted);
    assert!(!outcome.must_continue);
    assert!(!captures_from(&outcome.board, pos(0, 1)).is_empty());

    let mut session = red_session(b);
    match session.apply_move(pos(2, 3), pos(0, 1)).unwrap() {
        Transition::TurnComplete {
            board,
            side_to_move,
            winner,
        } => {
            assert_eq!(board.get(pos(0, 1)), Some(Piece::king(Side::Red)));
            assert!(board.is_empty_at(pos(1, 2)));
            assert_eq!(side_to_move, Side::Black);
            assert_eq!(winner, None);
        }
        other => panic!("expected a completed turn, got {other:?}"),
    }
}

#[test]
fn king_captures_adjacent_enemy_with_free_landing() {
    let b = board(
        "
        ........
        ........
        ........
        ..b.....
        ...R....
        ........
        ........
        b.......
        ",
    );
    let captures = captures_from(&b, pos(4, 3));
    assert_eq!(captures, vec![Move::jump(pos(4, 3), pos(2, 1), pos(3, 2))]);

    let mut session = red_session(b);
    assert!(matches!(
        session.apply_move(pos(4, 3), pos(5, 4)),
        Err(RuleError::IllegalDestination)
    ));
    assert!(matches!(
        session.apply_move(pos(4, 3), pos(2, 1)),
        Ok(Transition::TurnComplete { .. })
    ));
}

#[test]
fn simple_move_refused_while_a_capture_exists() {
    let b = board(
        "
        ........
        ........
        ........
        ..b.....
        ...r....
        ........
        .....r..
        ......b.
        ",
    );
    let mut session = red_session(b.clone());
    assert_eq!(
        session.apply_move(pos(6, 5), pos(5, 6)),
        Err(RuleError::CaptureObligationViolation)
    );
    assert_eq!(session.board(), &b);
}

#[test]
fn chain_is_played_one_jump_at_a_time() {
    let b = board(
        "
        .......b
        ........
        ........
        ....b...
        ........
        ..b.....
        .r......
        ........
        ",
    );
    let mut session = red_session(b);
    assert_eq!(
        session.activate(pos(6, 1)),
        Ok(Transition::Selected(pos(6, 1)))
    );

    match session.activate(pos(4, 3)).unwrap() {
        Transition::JumpPending {
            board,
            side_to_move,
            forced,
        } => {
            assert_eq!(side_to_move, Side::Red);
            assert_eq!(forced, pos(4, 3));
            assert!(board.is_empty_at(pos(5, 2)));
        }
        other => panic!("expected a pending chain, got {other:?}"),
    }
    assert_eq!(session.phase(), TurnPhase::MustContinueJump(pos(4, 3)));

    assert_eq!(
        session.activate(pos(3, 2)),
        Err(RuleError::MustContinueSamePiece)
    );

    match session.activate(pos(2, 5)).unwrap() {
        Transition::TurnComplete {
            board,
            side_to_move,
            winner,
        } => {
            assert_eq!(board.count(Side::Black), 1);
            assert_eq!(side_to_move, Side::Black);
            assert_eq!(winner, None);
        }
        other => panic!("expected a completed turn, got {other:?}"),
    }
}

#[test]
fn taking_the_last_piece_wins() {
    let b = board(
        "
        ........
        ........
        ........
        ..b.....
        ...r....
        ........
        ........
        ........
        ",
    );
    let mut session = red_session(b);
    match session.apply_move(pos(4, 3), pos(2, 1)).unwrap() {
        Transition::TurnComplete { winner, .. } => assert_eq!(winner, Some(Side::Red)),
        other => panic!("expected a completed turn, got {other:?}"),
    }
    assert!(session.is_concluded());
    assert_eq!(
        session.activate(pos(2, 1)),
        Err(RuleError::GameAlreadyConcluded)
    );
}

#[test]
fn two_clients_stay_in_step_through_the_store() {
    let store = GameStore::new();
    let (room, doc) = store.create(Some("room-1"), "alice").unwrap();
    assert_eq!(get_game_status(&doc), "waiting");

    let (seat, doc) = store.join(&room, "bob").unwrap();
    assert_eq!(seat, Seat::Player(Side::Black));
    assert_eq!(doc.status, GameStatus::Active);

    let mut red = red_session(doc.board.clone());
    let mut black = GameSession::new(doc.board.clone(), Side::Red, Some(Side::Black), false);

    assert_eq!(
        black.apply_move(pos(2, 1), pos(3, 0)),
        Err(RuleError::NotPlayersTurn)
    );

    let Transition::TurnComplete {
        board,
        side_to_move,
        winner,
    } = red.apply_move(pos(5, 2), pos(4, 3)).unwrap()
    else {
        panic!("opening step should complete the turn");
    };
    let doc = store.commit_turn(&room, board, side_to_move, winner).unwrap();
    assert_eq!(get_game_status(&doc), "black_turn");

    assert!(black.sync(doc.version, doc.board.clone(), doc.side_to_move, doc.is_concluded()));
    assert!(red.sync(doc.version, doc.board.clone(), doc.side_to_move, doc.is_concluded()));
    assert_eq!(black.board(), red.board());
    assert!(matches!(
        black.apply_move(pos(2, 1), pos(3, 0)),
        Ok(Transition::TurnComplete { .. })
    ));
}

#[test]
fn observer_cannot_move() {
    let store = GameStore::new();
    let (room, _) = store.create(None, "alice").unwrap();
    store.join(&room, "bob").unwrap();
    let (seat, doc) = store.join(&room, "carol").unwrap();
    assert_eq!(seat, Seat::Observer);

    let mut session = GameSession::new(doc.board, doc.side_to_move, seat.side(), false);
    assert_eq!(
        session.activate(pos(5, 0)),
        Err(RuleError::NotPlayersTurn)
    );
}

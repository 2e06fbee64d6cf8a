use crate::prelude::*;

/// An interactive session's cube plus an ordered log of the moves applied to
/// it. Supports undoing the last move or unwinding the whole session. The
/// search strategies never use this; they track their own paths.
#[derive(Debug, Clone)]
pub struct MoveHistory {
    cube: Cube,
    log: Vec<Move>,
}

impl MoveHistory {
    pub fn new(cube: Cube) -> MoveHistory {
        MoveHistory {
            cube,
            log: Vec::new(),
        }
    }

    pub fn cube(&self) -> &Cube {
        &self.cube
    }

    pub fn apply(&mut self, move_: Move) {
        self.cube = self.cube.apply(move_);
        self.log.push(move_);
    }

    pub fn apply_sequence(&mut self, tokens: &str) -> Result<(), ParseMoveError> {
        for move_ in Move::parse_sequence(tokens)? {
            self.apply(move_);
        }
        Ok(())
    }

    /// Applies the inverse of the most recent move and pops it from the log.
    pub fn undo_last(&mut self) -> Option<Move> {
        let move_ = self.log.pop()?;
        self.cube = self.cube.apply(move_.inverse());
        Some(move_)
    }

    /// Unwinds the whole log, newest move first.
    pub fn undo_all(&mut self) {
        while self.undo_last().is_some() {}
    }

    pub fn history(&self) -> &[Move] {
        &self.log
    }

    pub fn solution_string(&self) -> String {
        format_sequence(&self.log)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_updates_cube_and_log() {
        let mut session = MoveHistory::new(Cube::solved());
        session.apply_sequence("R U R' U'").unwrap();

        assert_eq!(session.history().len(), 4);
        assert_eq!(session.solution_string(), "R U R' U'");
        assert_eq!(
            *session.cube(),
            Cube::solved().apply_all(Move::parse_sequence("R U R' U'").unwrap())
        );
    }

    #[test]
    fn undo_last_restores_previous_state() {
        let mut session = MoveHistory::new(Cube::solved());
        session.apply("F".parse().unwrap());
        let before = *session.cube();
        session.apply("D2".parse().unwrap());

        assert_eq!(session.undo_last(), Some("D2".parse().unwrap()));
        assert_eq!(*session.cube(), before);
        assert_eq!(session.history().len(), 1);
    }

    #[test]
    fn undo_on_empty_log_is_a_no_op() {
        let mut session = MoveHistory::new(Cube::solved());
        assert_eq!(session.undo_last(), None);
        assert_eq!(*session.cube(), Cube::solved());
    }

    #[test]
    fn undo_all_returns_to_the_starting_state() {
        let start = Cube::solved().apply("L".parse().unwrap());
        let mut session = MoveHistory::new(start);
        session.apply_sequence("B2 U' R F' L2 D").unwrap();

        session.undo_all();

        assert_eq!(*session.cube(), start);
        assert!(session.history().is_empty());
    }
}

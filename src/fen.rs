//! FEN field tokenizer.
//!
//! Splits a Forsyth-Edwards string into its six whitespace-separated fields,
//! applying the defaults FEN allows for trailing fields. `board.rs` owns the
//! semantics of each field (piece placement, castling rights, ...); this
//! module only owns splitting and is kept separate so that boundary matches
//! how the rest of the crate separates board state from its textual form.

pub struct FenFields<'a> {
    pub placement: &'a str,
    pub side: &'a str,
    pub castling: &'a str,
    pub en_passant: &'a str,
    pub halfmove: &'a str,
    pub fullmove: &'a str,
}

pub fn tokenize(fen: &str) -> Result<FenFields<'_>, &'static str> {
    let mut parts = fen.split_whitespace();
    let placement = parts.next().ok_or("FEN missing board part")?;
    let side = parts.next().ok_or("FEN missing side to move")?;
    let castling = parts.next().unwrap_or("-");
    let en_passant = parts.next().unwrap_or("-");
    let halfmove = parts.next().unwrap_or("0");
    let fullmove = parts.next().unwrap_or("1");

    Ok(FenFields { placement, side, castling, en_passant, halfmove, fullmove })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenizes_full_fen() {
        let f = tokenize("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1").unwrap();
        assert_eq!(f.placement, "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR");
        assert_eq!(f.side, "w");
        assert_eq!(f.castling, "KQkq");
        assert_eq!(f.en_passant, "-");
        assert_eq!(f.halfmove, "0");
        assert_eq!(f.fullmove, "1");
    }

    #[test]
    fn fills_in_defaults_for_missing_trailing_fields() {
        let f = tokenize("8/8/8/8/8/8/8/8 w").unwrap();
        assert_eq!(f.castling, "-");
        assert_eq!(f.en_passant, "-");
        assert_eq!(f.halfmove, "0");
        assert_eq!(f.fullmove, "1");
    }

    #[test]
    fn rejects_missing_board_part() {
        assert!(tokenize("").is_err());
    }
}

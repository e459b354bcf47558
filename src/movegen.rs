//! Pseudo-legal move generation for all piece types.
//!
//! This module provides:
//! - Generic move generation for sliding and leaper pieces via the `Attacker` trait.
//! - Specialized pawn move generation, including captures, promotions, double
//!   pushes, and en passant.
//! - Castling, which needs occupancy and attack checks the generic path doesn't do.
//!
//! "Pseudo-legal" here means king safety is not checked during generation;
//! `Position::make_move` rejects a move that leaves the mover's own king in
//! check, same division of responsibility as the original engine.

use crate::bitboard::Bitboard;
use crate::board::Position;
use crate::moves::{Move, MoveFlags, MoveList};
use crate::types::{BKC, BQC, Color, Piece, PieceType, WKC, WQC};

/// Trait for pieces that can generate pseudo-legal attacks from a square.
pub trait Attacker {
    const TYPE: PieceType;
    fn get_attacks(from: u8, pos: &Position) -> Bitboard;
}

pub struct Knight;
impl Attacker for Knight {
    const TYPE: PieceType = PieceType::Knight;
    #[inline(always)]
    fn get_attacks(from: u8, pos: &Position) -> Bitboard {
        pos.attack_tables.knight[from as usize]
    }
}

pub struct King;
impl Attacker for King {
    const TYPE: PieceType = PieceType::King;
    #[inline(always)]
    fn get_attacks(from: u8, pos: &Position) -> Bitboard {
        pos.attack_tables.king[from as usize]
    }
}

pub struct Bishop;
impl Attacker for Bishop {
    const TYPE: PieceType = PieceType::Bishop;
    #[inline(always)]
    fn get_attacks(from: u8, pos: &Position) -> Bitboard {
        pos.attack_tables.magic_tables.bishop_attacks(from, pos.occupied_squares())
    }
}

pub struct Rook;
impl Attacker for Rook {
    const TYPE: PieceType = PieceType::Rook;
    #[inline(always)]
    fn get_attacks(from: u8, pos: &Position) -> Bitboard {
        pos.attack_tables.magic_tables.rook_attacks(from, pos.occupied_squares())
    }
}

pub struct Queen;
impl Attacker for Queen {
    const TYPE: PieceType = PieceType::Queen;
    #[inline(always)]
    fn get_attacks(from: u8, pos: &Position) -> Bitboard {
        pos.attack_tables.magic_tables.queen_attacks(from, pos.occupied_squares())
    }
}

/// Generates every pseudo-legal move for the side to move.
pub fn generate_all_moves(pos: &Position, moves: &mut MoveList) {
    let us = pos.side_to_move();

    generate_piece_moves::<Knight>(pos, us, moves);
    generate_piece_moves::<Bishop>(pos, us, moves);
    generate_piece_moves::<Rook>(pos, us, moves);
    generate_piece_moves::<Queen>(pos, us, moves);
    generate_piece_moves::<King>(pos, us, moves);

    generate_pawn_moves(pos, us, moves);
    generate_castling_moves(pos, us, moves);
}

/// Generates captures only, used by quiescence search.
pub fn generate_captures(pos: &Position, moves: &mut MoveList) {
    let us = pos.side_to_move();
    let them = pos.color(!us);

    generate_piece_captures::<Knight>(pos, us, them, moves);
    generate_piece_captures::<Bishop>(pos, us, them, moves);
    generate_piece_captures::<Rook>(pos, us, them, moves);
    generate_piece_captures::<Queen>(pos, us, them, moves);
    generate_piece_captures::<King>(pos, us, them, moves);

    generate_pawn_captures(pos, us, moves);
}

fn generate_piece_moves<P: Attacker>(pos: &Position, us: Color, moves: &mut MoveList) {
    let piece = Piece::new(us, P::TYPE);
    let target_mask = !pos.color(us);
    let mut attackers = pos.piece(P::TYPE) & pos.color(us);

    while !attackers.is_empty() {
        let from = attackers.pop_lsb();
        let mut attacks = P::get_attacks(from, pos) & target_mask;
        while !attacks.is_empty() {
            let to = attacks.pop_lsb();
            let capture = pos.color(!us).test(to);
            moves.push(Move::new(from, to, piece, MoveFlags { capture, ..Default::default() }));
        }
    }
}

fn generate_piece_captures<P: Attacker>(pos: &Position, us: Color, them: Bitboard, moves: &mut MoveList) {
    let piece = Piece::new(us, P::TYPE);
    let mut attackers = pos.piece(P::TYPE) & pos.color(us);

    while !attackers.is_empty() {
        let from = attackers.pop_lsb();
        let mut attacks = P::get_attacks(from, pos) & them;
        while !attacks.is_empty() {
            let to = attacks.pop_lsb();
            moves.push(Move::new(from, to, piece, MoveFlags { capture: true, ..Default::default() }));
        }
    }
}

const PROMOTION_PIECES: [PieceType; 4] = [PieceType::Queen, PieceType::Rook, PieceType::Bishop, PieceType::Knight];

fn push_promotions(moves: &mut MoveList, from: u8, to: u8, us: Color, capture: bool) {
    for &kind in &PROMOTION_PIECES {
        let flags = MoveFlags { promoted: Some(Piece::new(us, kind)), capture, ..Default::default() };
        moves.push(Move::new(from, to, Piece::new(us, PieceType::Pawn), flags));
    }
}

fn generate_pawn_moves(pos: &Position, us: Color, moves: &mut MoveList) {
    let pawn = Piece::new(us, PieceType::Pawn);
    let mut pawns = pos.piece(PieceType::Pawn) & pos.color(us);
    let empty = pos.empty_squares();
    let them = pos.color(!us);
    let promotion_rank: Bitboard = if us == Color::White { Bitboard::rank_8() } else { Bitboard::rank_1() };
    let ep_bb = pos.en_passant_square().map(Bitboard::from_square).unwrap_or_default();

    while !pawns.is_empty() {
        let from = pawns.pop_lsb();

        // Pushes.
        let push_target = pos.attack_tables.pawn_push[us as usize][from as usize];
        if !(push_target & empty).is_empty() {
            let to = push_target.lsb();
            if promotion_rank.test(to) {
                push_promotions(moves, from, to, us, false);
            } else {
                moves.push(Move::new_quiet(from, to, pawn));
                let double_target = pos.attack_tables.pawn_double_push[us as usize][from as usize];
                if !double_target.is_empty() && !(double_target & empty).is_empty() {
                    let dto = double_target.lsb();
                    moves.push(Move::new(from, dto, pawn, MoveFlags { double_push: true, ..Default::default() }));
                }
            }
        }

        // Captures, including en passant.
        let mut attacks = pos.attack_tables.pawn_capture[us as usize][from as usize] & (them | ep_bb);
        while !attacks.is_empty() {
            let to = attacks.pop_lsb();
            if ep_bb.test(to) {
                moves.push(Move::new(from, to, pawn, MoveFlags { capture: true, enpassant: true, ..Default::default() }));
            } else if promotion_rank.test(to) {
                push_promotions(moves, from, to, us, true);
            } else {
                moves.push(Move::new(from, to, pawn, MoveFlags { capture: true, ..Default::default() }));
            }
        }
    }
}

fn generate_pawn_captures(pos: &Position, us: Color, moves: &mut MoveList) {
    let pawn = Piece::new(us, PieceType::Pawn);
    let mut pawns = pos.piece(PieceType::Pawn) & pos.color(us);
    let them = pos.color(!us);
    let promotion_rank: Bitboard = if us == Color::White { Bitboard::rank_8() } else { Bitboard::rank_1() };
    let ep_bb = pos.en_passant_square().map(Bitboard::from_square).unwrap_or_default();

    while !pawns.is_empty() {
        let from = pawns.pop_lsb();
        let mut attacks = pos.attack_tables.pawn_capture[us as usize][from as usize] & (them | ep_bb);
        while !attacks.is_empty() {
            let to = attacks.pop_lsb();
            if ep_bb.test(to) {
                moves.push(Move::new(from, to, pawn, MoveFlags { capture: true, enpassant: true, ..Default::default() }));
            } else if promotion_rank.test(to) {
                push_promotions(moves, from, to, us, true);
            } else {
                moves.push(Move::new(from, to, pawn, MoveFlags { capture: true, ..Default::default() }));
            }
        }
    }
}

fn generate_castling_moves(pos: &Position, us: Color, moves: &mut MoveList) {
    let rights = pos.castling_rights();
    let occ = pos.occupied_squares();
    let king = Piece::new(us, PieceType::King);

    match us {
        Color::White => {
            if rights & WKC != 0 && !occ.test(61) && !occ.test(62) && !pos.is_square_attacked(60, Color::Black) && !pos.is_square_attacked(61, Color::Black) && !pos.is_square_attacked(62, Color::Black) {
                moves.push(Move::new(60, 62, king, MoveFlags { castling: true, ..Default::default() }));
            }
            if rights & WQC != 0 && !occ.test(59) && !occ.test(58) && !occ.test(57) && !pos.is_square_attacked(60, Color::Black) && !pos.is_square_attacked(59, Color::Black) && !pos.is_square_attacked(58, Color::Black) {
                moves.push(Move::new(60, 58, king, MoveFlags { castling: true, ..Default::default() }));
            }
        }
        Color::Black => {
            if rights & BKC != 0 && !occ.test(5) && !occ.test(6) && !pos.is_square_attacked(4, Color::White) && !pos.is_square_attacked(5, Color::White) && !pos.is_square_attacked(6, Color::White) {
                moves.push(Move::new(4, 6, king, MoveFlags { castling: true, ..Default::default() }));
            }
            if rights & BQC != 0 && !occ.test(3) && !occ.test(2) && !occ.test(1) && !pos.is_square_attacked(4, Color::White) && !pos.is_square_attacked(3, Color::White) && !pos.is_square_attacked(2, Color::White) {
                moves.push(Move::new(4, 2, king, MoveFlags { castling: true, ..Default::default() }));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn startpos_has_twenty_moves() {
        let pos = Position::startpos();
        let mut moves = MoveList::new();
        generate_all_moves(&pos, &mut moves);
        assert_eq!(moves.count(), 20);
    }

    #[test]
    fn castling_blocked_by_occupied_square_is_not_generated() {
        let mut pos = Position::new();
        pos.from_fen("r3k2r/8/8/8/8/8/8/R3K1NR w KQkq - 0 1").unwrap();
        let mut moves = MoveList::new();
        generate_castling_moves(&pos, Color::White, &mut moves);
        // Kingside blocked by the knight on g1; queenside still available.
        assert!(moves.iter().all(|m| m.dest() != 62));
        assert!(moves.iter().any(|m| m.dest() == 58));
    }

    #[test]
    fn castling_through_check_is_not_generated() {
        let mut pos = Position::new();
        pos.from_fen("4k3/8/8/8/8/8/8/R3K2r w KQkq - 0 1").unwrap();
        let mut moves = MoveList::new();
        generate_castling_moves(&pos, Color::White, &mut moves);
        // Black rook on h1 attacks f1/g1, so kingside castling must be excluded.
        assert!(moves.iter().all(|m| m.dest() != 62));
    }

    #[test]
    fn en_passant_capture_is_generated() {
        let mut pos = Position::new();
        pos.from_fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1").unwrap();
        let mut moves = MoveList::new();
        generate_pawn_moves(&pos, Color::White, &mut moves);
        assert!(moves.iter().any(|m| m.is_enpassant()));
    }

    #[test]
    fn pawn_promotion_generates_four_piece_choices() {
        let mut pos = Position::new();
        pos.from_fen("8/4P3/8/8/8/8/8/4k2K w - - 0 1").unwrap();
        let mut moves = MoveList::new();
        generate_pawn_moves(&pos, Color::White, &mut moves);
        assert_eq!(moves.iter().filter(|m| m.is_promotion()).count(), 4);
    }
}

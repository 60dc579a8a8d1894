//! Check and pin analysis for fully legal move generation.
//!
//! `Restrictions::compute` looks at the side to move once and records what any
//! legal move must respect: which squares resolve a check, which squares the
//! king may not step on, and the ray each pinned piece is confined to. The
//! restrictions then filter pseudo-legal moves without making them, except for
//! en-passant captures which are verified by make-and-test.

use crate::board::{Color, Move, PieceKind, Position};
use crate::utils::{self, square_mask, step, DIAGONAL_DIRECTIONS, STRAIGHT_DIRECTIONS};

/// How the king of the side to move is attacked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckState {
    None,
    /// A single bishop, rook or queen gives check
    Sliding { checker: usize },
    /// A single pawn or knight gives check
    NonSliding { checker: usize },
    Double,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Restrictions {
    pub check: CheckState,
    /// Destinations that resolve the current check (all squares when not in check)
    pub check_mask: u64,
    /// Squares attacked by the opponent with our king lifted off the board
    pub king_danger: u64,
    pub pinned: u64,
    /// For a pinned piece: the squares between king and pinner, pinner included
    pub pin_rays: [u64; 64],
}

impl Restrictions {
    pub fn compute(pos: &Position) -> Self {
        let us = pos.side_to_move();
        let them = us.opposite();

        let Some(king_sq) = pos.king_square(us) else {
            // no king: nothing to protect
            return Self::unrestricted();
        };

        let king_mask = square_mask(king_sq);
        let occ = pos.occupied();
        let king_danger =
            pos.sliding_attacks(them, occ & !king_mask) | pos.non_sliding_attacks(them);

        let mut restrictions = Self::unrestricted();
        restrictions.king_danger = king_danger;

        if king_danger & king_mask != 0 {
            let sliders = pos.slider_attackers_to(king_sq, them, occ);
            let others = pos.non_slider_attackers_to(king_sq, them);
            restrictions.check = match ((sliders | others).count_ones(), sliders) {
                (0, _) => CheckState::None,
                (1, 0) => CheckState::NonSliding {
                    checker: others.trailing_zeros() as usize,
                },
                (1, _) => CheckState::Sliding {
                    checker: sliders.trailing_zeros() as usize,
                },
                _ => CheckState::Double,
            };
            restrictions.check_mask = match restrictions.check {
                CheckState::None => !0,
                CheckState::Sliding { checker } => {
                    utils::ray_between(king_sq, checker) | square_mask(checker)
                }
                CheckState::NonSliding { checker } => square_mask(checker),
                CheckState::Double => 0,
            };
        }

        restrictions.find_pins(pos, king_sq, us);
        restrictions
    }

    fn unrestricted() -> Self {
        Self {
            check: CheckState::None,
            check_mask: !0,
            king_danger: 0,
            pinned: 0,
            pin_rays: [0; 64],
        }
    }

    // Walk the eight rays out of the king looking for own piece + enemy slider
    fn find_pins(&mut self, pos: &Position, king_sq: usize, us: Color) {
        let them = us.opposite();
        let own = pos.occupancy(us);
        let enemy = pos.occupancy(them);
        let queens = pos.pieces(PieceKind::Queen, them);
        let straight_pinners = pos.pieces(PieceKind::Rook, them) | queens;
        let diagonal_pinners = pos.pieces(PieceKind::Bishop, them) | queens;

        let rays = STRAIGHT_DIRECTIONS
            .iter()
            .map(|&dir| (dir, straight_pinners))
            .chain(DIAGONAL_DIRECTIONS.iter().map(|&dir| (dir, diagonal_pinners)));

        for (dir, pinners) in rays {
            let mut candidate: Option<usize> = None;
            let mut ray = 0u64;
            let mut cur = king_sq;
            while let Some(next) = step(cur, dir) {
                let bit = square_mask(next);
                ray |= bit;
                if own & bit != 0 {
                    if candidate.is_some() {
                        break;
                    }
                    candidate = Some(next);
                } else if enemy & bit != 0 {
                    if let Some(pinned_sq) = candidate {
                        if pinners & bit != 0 {
                            self.pinned |= square_mask(pinned_sq);
                            self.pin_rays[pinned_sq] = ray;
                        }
                    }
                    break;
                }
                cur = next;
            }
        }
    }

    #[inline]
    pub fn in_check(&self) -> bool {
        self.check != CheckState::None
    }

    /// Whether a non-en-passant pseudo-legal move by a piece of `kind`
    /// satisfies the restrictions
    #[inline]
    pub fn allows(&self, kind: PieceKind, mv: Move) -> bool {
        if kind == PieceKind::King {
            return mv.to & self.king_danger == 0;
        }
        if self.check == CheckState::Double {
            return false;
        }
        if mv.from & self.pinned != 0 && mv.to & self.pin_rays[mv.from_sq()] == 0 {
            return false;
        }
        mv.to & self.check_mask != 0
    }
}

/// Append the legal moves of the side to move to `out`
pub fn generate_legal_into(pos: &Position, out: &mut Vec<Move>) {
    let restrictions = Restrictions::compute(pos);
    let ep_mask = pos.en_passant_mask();
    let mut pseudo = Vec::with_capacity(32);

    for kind in PieceKind::ALL {
        if restrictions.check == CheckState::Double && kind != PieceKind::King {
            continue;
        }
        pseudo.clear();
        pos.generate_pseudo_moves_for(kind, &mut pseudo);
        for &mv in &pseudo {
            let legal = if kind == PieceKind::Pawn && mv.to & ep_mask != 0 {
                pos.leaves_king_safe(mv)
            } else {
                restrictions.allows(kind, mv)
            };
            if legal {
                out.push(mv);
            }
        }
    }
}

pub fn generate_legal_moves(pos: &Position) -> Vec<Move> {
    let mut moves = Vec::with_capacity(64);
    generate_legal_into(pos, &mut moves);
    moves
}

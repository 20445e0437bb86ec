//! Property tests for the algebraic laws of the core types.

use std::sync::Arc;

use enigma::{Alphabet, MachineConfig, Permutation, Setting};
use proptest::prelude::*;

const DEFAULT_CONF: &str = include_str!("data/default.conf");
const UPPER: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// A shuffled upper-case alphabet split into random cycles.
fn cycles_strategy() -> impl Strategy<Value = String> {
    (
        Just(UPPER.chars().collect::<Vec<_>>()).prop_shuffle(),
        prop::collection::vec(1usize..6, 1..12),
    )
        .prop_map(|(symbols, lens)| {
            let mut out = String::new();
            let mut rest = symbols.as_slice();
            for len in lens {
                if rest.is_empty() {
                    break;
                }
                let take = len.min(rest.len());
                out.push('(');
                out.extend(&rest[..take]);
                out.push_str(") ");
                rest = &rest[take..];
            }
            out
        })
}

fn message_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(UPPER.chars().collect::<Vec<_>>()), 0..200)
        .prop_map(|chars| chars.into_iter().collect())
}

proptest! {
    #[test]
    fn alphabet_index_round_trip(i in 0usize..26) {
        let alpha = Alphabet::default();
        let ch = alpha.to_char(i).unwrap();
        prop_assert_eq!(alpha.to_index(ch).unwrap(), i);
    }

    #[test]
    fn permutation_invert_undoes_permute(cycles in cycles_strategy(), p in -100i64..100) {
        let alpha = Arc::new(Alphabet::default());
        let perm = Permutation::new(&cycles, &alpha).unwrap();
        let wrapped = perm.wrap(p);
        prop_assert_eq!(perm.invert(perm.permute(p) as i64), wrapped);
        prop_assert_eq!(perm.permute(perm.invert(p) as i64), wrapped);

        let ch = alpha.to_char(wrapped).unwrap();
        prop_assert_eq!(perm.invert_char(perm.permute_char(ch).unwrap()).unwrap(), ch);
    }

    #[test]
    fn permutation_display_reparses(cycles in cycles_strategy()) {
        let alpha = Arc::new(Alphabet::default());
        let perm = Permutation::new(&cycles, &alpha).unwrap();
        let again = Permutation::new(&perm.to_string(), &alpha).unwrap();
        for i in 0..26 {
            prop_assert_eq!(perm.permute(i), again.permute(i));
        }
    }

    #[test]
    fn machine_is_self_inverse(
        msg in message_strategy(),
        posns in "[A-Z]{4}",
        pairs in prop::sample::subsequence(UPPER.chars().collect::<Vec<_>>(), 0..=20),
    ) {
        // Adjacent symbols of the subsequence form plugboard swaps.
        let plugboard: String = pairs
            .chunks_exact(2)
            .map(|p| format!("({}{}) ", p[0], p[1]))
            .collect();
        let line = format!("* B Beta III IV I {} {}", posns, plugboard);
        let setting = Setting::parse(&line, 5).unwrap();

        let mut machine = MachineConfig::parse(DEFAULT_CONF).unwrap().build().unwrap();
        machine.apply_setting(&setting).unwrap();
        let cipher = machine.convert(&msg).unwrap();
        prop_assert_eq!(cipher.len(), msg.len());
        for (c, m) in cipher.chars().zip(msg.chars()) {
            prop_assert_ne!(c, m);
        }

        machine.apply_setting(&setting).unwrap();
        prop_assert_eq!(machine.convert(&cipher).unwrap(), msg);
    }
}

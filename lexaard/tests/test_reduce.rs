use lexaard::convert::{automaton_to_expression, eliminations, lift_automaton, reduce_to_expression};
use lexaard::{ConcatSemantics, Dfa, Expression, Gnfa, MatchOptions};

#[ctor::ctor]
fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

const EVEN_BS: &str = "\
even bs
ab
s p q f
s .. r. .. ..
p .. a  b  r.
q .. b  a  ..
";

fn backtracking() -> MatchOptions {
    MatchOptions::default().with_concat_semantics(ConcatSemantics::Backtracking)
}

#[test]
fn test_steps() {
    let g: Gnfa = EVEN_BS.parse().unwrap();
    let counts: Vec<usize> = eliminations(&g).map(|step| step.state_count()).collect();

    assert_eq!(counts, [3, 2]);
    assert_eq!(counts.len(), g.state_count() - 2);
}

#[test]
fn test_reduced_expression_agrees_with_gnfa() {
    let g: Gnfa = EVEN_BS.parse().unwrap();
    let e = reduce_to_expression(&g);

    for input in ["", "a", "b", "bb", "ab", "bab", "abba", "bbb"] {
        assert_eq!(
            e.matches_with(input, &backtracking()).unwrap(),
            g.accepts(input).unwrap(),
            "{input}"
        );
    }
}

#[test]
fn test_two_state_gnfa() {
    let g = Gnfa::builder("two")
        .symbol('a')
        .start("q0")
        .accept("q1")
        .transition("q0", "q1", Expression::Char('a'))
        .build()
        .unwrap();

    let e = reduce_to_expression(&g);
    assert!(e.matches("a").unwrap());
    assert!(!e.matches("b").unwrap());
    assert!(!e.matches("").unwrap());
}

#[test]
fn test_rip_by_name() {
    let g: Gnfa = EVEN_BS.parse().unwrap();
    let without_q = g.rip("q").unwrap();

    assert_eq!(without_q.states(), ["s", "p", "f"]);
    assert_eq!(
        reduce_to_expression(&without_q).matches_with("abba", &backtracking()),
        Ok(true)
    );
}

const ONLY_A: &str = "\
only a
     a   b
 q0  q1  q2
*q1  q2  q2
 q2  q2  q2
";

#[test]
fn test_dfa_only_a() {
    let dfa: Dfa = ONLY_A.parse().unwrap();
    let e = automaton_to_expression(&dfa).unwrap();

    for input in ["", "a", "aa", "b"] {
        assert_eq!(e.matches(input).unwrap(), dfa.accepts(input), "{input}");
        assert_eq!(
            e.matches_with(input, &backtracking()).unwrap(),
            dfa.accepts(input),
            "{input}"
        );
    }
}

#[test]
fn test_dfa_odd_as() {
    let dfa: Dfa = "odd as\n a b\n q0 q1 q0\n*q1 q0 q1\n".parse().unwrap();
    let g = lift_automaton(&dfa).unwrap();
    let e = reduce_to_expression(&g);

    assert_eq!(g.state_count(), 4);
    for input in ["", "a", "b", "ab", "ba", "aa", "aba", "bab", "aaa"] {
        assert_eq!(g.accepts(input).unwrap(), dfa.accepts(input), "{input}");
        assert_eq!(
            e.matches_with(input, &backtracking()).unwrap(),
            dfa.accepts(input),
            "{input}"
        );
    }
}

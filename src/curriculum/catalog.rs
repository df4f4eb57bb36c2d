//! Built-in grammar catalog and curated probe lists.
//!
//! Topics are listed per level in curriculum order; the 1-based order of each
//! topic is its position in its level's list.

use crate::types::CefrLevel;

pub(crate) const A1_TOPICS: &[&str] = &[
    "a1_verb_to_be",
    "a1_subject_pronouns",
    "a1_articles_a_an_the",
    "a1_plural_nouns",
    "a1_this_that_these_those",
    "a1_possessive_adjectives",
    "a1_have_got",
    "a1_present_simple_affirmative",
    "a1_present_simple_negative_questions",
    "a1_there_is_there_are",
    "a1_can_ability",
    "a1_prepositions_of_place",
    "a1_prepositions_of_time",
    "a1_adverbs_of_frequency",
    "a1_imperatives",
    "a1_object_pronouns",
    "a1_possessive_s",
    "a1_countable_uncountable",
    "a1_some_any",
    "a1_present_continuous",
    "a1_like_love_hate_ing",
    "a1_past_simple_to_be",
    "a1_past_simple_regular",
    "a1_question_words",
];

pub(crate) const A2_TOPICS: &[&str] = &[
    "a2_past_simple_irregular",
    "a2_past_simple_questions",
    "a2_past_continuous",
    "a2_comparatives",
    "a2_superlatives",
    "a2_going_to_future",
    "a2_will_predictions",
    "a2_present_perfect_experience",
    "a2_much_many_a_lot_of",
    "a2_too_enough",
    "a2_adverbs_of_manner",
    "a2_should_advice",
    "a2_have_to_must",
    "a2_first_conditional",
    "a2_infinitive_of_purpose",
    "a2_verb_ing_or_infinitive",
    "a2_relative_pronouns_basic",
    "a2_present_perfect_just_already_yet",
    "a2_used_to",
    "a2_indefinite_pronouns",
];

pub(crate) const B1_TOPICS: &[&str] = &[
    "b1_present_perfect_vs_past_simple",
    "b1_present_perfect_continuous",
    "b1_past_perfect",
    "b1_second_conditional",
    "b1_passive_present_past",
    "b1_reported_statements",
    "b1_defining_relative_clauses",
    "b1_modals_of_deduction_present",
    "b1_future_continuous",
    "b1_zero_conditional",
    "b1_question_tags",
    "b1_so_such",
    "b1_gerunds_as_subjects",
    "b1_used_to_vs_be_used_to",
    "b1_phrasal_verbs_separable",
    "b1_reflexive_pronouns",
    "b1_quantifiers_few_little",
    "b1_indirect_questions",
    "b1_linking_words_contrast",
];

pub(crate) const B2_TOPICS: &[&str] = &[
    "b2_third_conditional",
    "b2_mixed_conditionals",
    "b2_passive_all_tenses",
    "b2_reported_questions_commands",
    "b2_non_defining_relative_clauses",
    "b2_modals_of_deduction_past",
    "b2_future_perfect",
    "b2_wish_if_only",
    "b2_causative_have_get",
    "b2_participle_clauses",
    "b2_past_perfect_continuous",
    "b2_articles_advanced",
    "b2_verb_patterns_advanced",
    "b2_unless_provided_as_long_as",
    "b2_would_rather_had_better",
    "b2_narrative_tenses",
    "b2_compound_adjectives",
    "b2_linking_words_cause_result",
];

pub(crate) const C1_TOPICS: &[&str] = &[
    "c1_inversion_negative_adverbials",
    "c1_cleft_sentences",
    "c1_advanced_passive_reporting",
    "c1_future_in_the_past",
    "c1_subjunctive",
    "c1_ellipsis_substitution",
    "c1_modal_perfects_criticism",
    "c1_participle_clauses_advanced",
    "c1_nominalisation",
    "c1_fronting",
    "c1_conditionals_without_if",
    "c1_distancing_language",
    "c1_discourse_markers",
    "c1_hedging",
    "c1_emphatic_do",
];

pub(crate) const C2_TOPICS: &[&str] = &[
    "c2_inversion_conditionals",
    "c2_advanced_cleft_structures",
    "c2_complex_noun_phrases",
    "c2_subjunctive_formal",
    "c2_ellipsis_advanced",
    "c2_modal_nuance",
    "c2_reduced_relative_clauses",
    "c2_idiomatic_verb_patterns",
    "c2_advanced_hedging",
    "c2_rhetorical_structures",
    "c2_collocational_grammar",
    "c2_register_shifting",
    "c2_archaic_literary_forms",
    "c2_concessive_clauses",
    "c2_stylistic_inversion",
];

pub(crate) fn topics_for(level: CefrLevel) -> &'static [&'static str] {
    match level {
        CefrLevel::A1 => A1_TOPICS,
        CefrLevel::A2 => A2_TOPICS,
        CefrLevel::B1 => B1_TOPICS,
        CefrLevel::B2 => B2_TOPICS,
        CefrLevel::C1 => C1_TOPICS,
        CefrLevel::C2 => C2_TOPICS,
    }
}

/// Gateway topics per boundary, A1/A2 through C1/C2
pub(crate) const GATEWAYS: [&[&str]; 5] = [
    &[
        "a1_past_simple_regular",
        "a2_past_simple_irregular",
        "a2_comparatives",
    ],
    &[
        "a2_first_conditional",
        "b1_present_perfect_vs_past_simple",
        "b1_passive_present_past",
    ],
    &[
        "b1_reported_statements",
        "b2_third_conditional",
        "b2_non_defining_relative_clauses",
    ],
    &[
        "b2_mixed_conditionals",
        "c1_inversion_negative_adverbials",
        "c1_cleft_sentences",
    ],
    &[
        "c1_subjunctive",
        "c2_inversion_conditionals",
        "c2_complex_noun_phrases",
    ],
];

/// Foundational topic that opens the session for a self-reported beginner
pub(crate) const FLOOR_PROBES: &[&str] = &["a1_verb_to_be"];

//! Rule-based Japanese deconjugation: walks a word backward through a table
//! of conjugation rules to recover every plausible dictionary form, paired
//! with the chain of grammatical forms that would produce the original word
//! from that base.
//!
//! This is independent of MeCab: it doesn't need a dictionary or a lattice,
//! just suffix matching against [`RULES`]. [`crate::query`] uses it as one
//! of several ways to generate search candidates for a piece of text; MeCab
//! segmentation ([`crate::mecab_adapter`]) narrows down *where* a word
//! starts, and this narrows down *what dictionary form* it might be.

use std::sync::LazyLock;

/// A grammatical form a word can be in. Used both as a rule's source/target
/// classification and, chained together, as the human-readable derivation
/// path attached to a deconjugation result.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WordForm {
    GodanVerb,
    IchidanVerb,
    SuruVerb,
    KuruVerb,
    IrregularVerb,
    Adjective,
    Negative,
    Past,
    Te,
    Conjunctive,
    Volitional,
    Passive,
    Causative,
    Imperative,
    Potential,
    PotentialPassive,
    Conditional,
    ImperativeNegative,
    Zaru,
    Zu,
    Nu,
    Neba,
    Tari,
    Shimau,
    Chau,
    Chimau,
    Polite,
    Tara,
    Tai,
    Nasai,
    Sugiru,
    Sou,
    E,
    Ba,
    Ki,
    Toku,
    ColloquialNegative,
    ProvisionalColloquialNegative,
    Continuous,
    Adverbial,
    Noun,
    Any,
}

impl WordForm {
    /// Human-readable label used to build [`ConjugationInfo::derivation_display`].
    fn display(self) -> &'static str {
        match self {
            WordForm::GodanVerb => "godan verb",
            WordForm::IchidanVerb => "ichidan verb",
            WordForm::SuruVerb => "suru verb",
            WordForm::KuruVerb => "kuru verb",
            WordForm::IrregularVerb => "irregular verb",
            WordForm::Adjective => "adjective",
            WordForm::Negative => "negative",
            WordForm::Past => "past",
            WordForm::Te => "-te",
            WordForm::Conjunctive => "masu stem",
            WordForm::Volitional => "volitional",
            WordForm::Passive => "passive",
            WordForm::Causative => "causative",
            WordForm::Imperative => "imperative",
            WordForm::Potential => "potential",
            WordForm::PotentialPassive => "potential or passive",
            WordForm::Conditional => "conditional",
            WordForm::ImperativeNegative => "imperative negative",
            WordForm::Zaru => "-zaru",
            WordForm::Zu => "-zu",
            WordForm::Nu => "-nu",
            WordForm::Neba => "-neba",
            WordForm::Tari => "-tari",
            WordForm::Shimau => "-shimau",
            WordForm::Chau => "-chau",
            WordForm::Chimau => "-chimau",
            WordForm::Polite => "polite",
            WordForm::Tara => "-tara",
            WordForm::Tai => "-tai",
            WordForm::Nasai => "-nasai",
            WordForm::Sugiru => "-sugiru",
            WordForm::Sou => "-sou",
            WordForm::E => "-e",
            WordForm::Ba => "-ba",
            WordForm::Ki => "-ki",
            WordForm::Toku => "-toku",
            WordForm::ColloquialNegative => "colloquial negative",
            WordForm::ProvisionalColloquialNegative => "provisional colloquial negative",
            WordForm::Continuous => "progressive or perfect",
            WordForm::Adverbial => "adv",
            WordForm::Noun => "noun",
            WordForm::Any => "unknown",
        }
    }

    /// A terminal form is one a dictionary entry can actually be keyed on:
    /// recursion stops descending once it reaches one of these.
    fn is_terminal(self) -> bool {
        matches!(
            self,
            WordForm::GodanVerb
                | WordForm::IchidanVerb
                | WordForm::SuruVerb
                | WordForm::KuruVerb
                | WordForm::Adjective
        )
    }
}

struct Rule {
    base: &'static str,
    conjugated: &'static str,
    base_type: WordForm,
    conjugated_type: WordForm,
}

const fn rule(base: &'static str, conjugated: &'static str, base_type: WordForm, conjugated_type: WordForm) -> Rule {
    Rule { base, conjugated, base_type, conjugated_type }
}

/// Rules that re-classify a terminal form without consuming any characters,
/// e.g. an ichidan verb ending in "れる" is plausibly the potential form of
/// some other godan verb's passive. Checked only once a chain bottoms out at
/// a terminal form, so they never cause infinite recursion.
static SILENT_RULES: LazyLock<Vec<Rule>> = LazyLock::new(|| {
    use WordForm::*;
    vec![
        rule("ない", "ない", Negative, Adjective),
        rule("たい", "たい", Tai, Adjective),
        rule("せる", "せる", Causative, IchidanVerb),
        rule("れる", "れる", Passive, IchidanVerb),
        rule("る", "る", Potential, IchidanVerb),
        rule("られる", "られる", PotentialPassive, IchidanVerb),
        rule("しまう", "しまう", Shimau, GodanVerb),
        rule("ゃう", "ゃう", Chau, GodanVerb),
        rule("まう", "まう", Chimau, GodanVerb),
        rule("る", "る", Continuous, IchidanVerb),
        rule("おる", "おる", Continuous, GodanVerb),
        rule("すぎる", "すぎる", Sugiru, IchidanVerb),
        rule("とく", "とく", Toku, GodanVerb),
    ]
});

/// The conjugation table: each rule says "a word of `base_type` ending in
/// `base` can be conjugated to `conjugated_type` by replacing that ending
/// with `conjugated`". Deconjugation walks these backward, matching
/// `conjugated` as a suffix and substituting `base`.
static RULES: LazyLock<Vec<Rule>> = LazyLock::new(|| {
    use WordForm::*;
    vec![
        // Negative
        rule("る", "らない", GodanVerb, Negative),
        rule("う", "わない", GodanVerb, Negative),
        rule("つ", "たない", GodanVerb, Negative),
        rule("す", "さない", GodanVerb, Negative),
        rule("く", "かない", GodanVerb, Negative),
        rule("ぐ", "がない", GodanVerb, Negative),
        rule("ぶ", "ばない", GodanVerb, Negative),
        rule("む", "まない", GodanVerb, Negative),
        rule("ぬ", "なない", GodanVerb, Negative),
        rule("る", "ない", IchidanVerb, Negative),
        rule("くる", "こない", KuruVerb, Negative),
        rule("来る", "来ない", KuruVerb, Negative),
        rule("する", "しない", SuruVerb, Negative),
        rule("為る", "為ない", SuruVerb, Negative),
        // Past
        rule("る", "った", GodanVerb, Past),
        rule("う", "った", GodanVerb, Past),
        rule("つ", "った", GodanVerb, Past),
        rule("す", "した", GodanVerb, Past),
        rule("く", "いた", GodanVerb, Past),
        rule("ぐ", "いだ", GodanVerb, Past),
        rule("ぶ", "んだ", GodanVerb, Past),
        rule("む", "んだ", GodanVerb, Past),
        rule("ぬ", "んだ", GodanVerb, Past),
        rule("る", "た", IchidanVerb, Past),
        rule("くる", "きた", KuruVerb, Past),
        rule("来る", "来た", KuruVerb, Past),
        rule("する", "した", SuruVerb, Past),
        rule("為る", "為た", SuruVerb, Past),
        rule("行く", "行った", GodanVerb, Past),
        rule("いく", "いった", GodanVerb, Past),
        rule("問う", "問うた", GodanVerb, Past),
        rule("とう", "とうた", GodanVerb, Past),
        rule("請う", "請うた", GodanVerb, Past),
        rule("こう", "こうた", GodanVerb, Past),
        // Te
        rule("る", "って", GodanVerb, Te),
        rule("う", "って", GodanVerb, Te),
        rule("つ", "って", GodanVerb, Te),
        rule("す", "して", GodanVerb, Te),
        rule("く", "いて", GodanVerb, Te),
        rule("ぐ", "いで", GodanVerb, Te),
        rule("ぶ", "んで", GodanVerb, Te),
        rule("ぬ", "んで", GodanVerb, Te),
        rule("む", "んで", GodanVerb, Te),
        rule("る", "て", IchidanVerb, Te),
        rule("くる", "きて", KuruVerb, Te),
        rule("来る", "来て", KuruVerb, Te),
        rule("する", "して", SuruVerb, Te),
        rule("為る", "為て", SuruVerb, Te),
        rule("行く", "行って", GodanVerb, Te),
        rule("いく", "いって", GodanVerb, Te),
        rule("問う", "問うて", GodanVerb, Te),
        rule("とう", "とうて", GodanVerb, Te),
        rule("請う", "請うて", GodanVerb, Te),
        rule("こう", "こうて", GodanVerb, Te),
        // Toku
        rule("る", "っとく", GodanVerb, Toku),
        rule("う", "っとく", GodanVerb, Toku),
        rule("つ", "っとく", GodanVerb, Toku),
        rule("す", "しとく", GodanVerb, Toku),
        rule("く", "いとく", GodanVerb, Toku),
        rule("ぐ", "いどく", GodanVerb, Toku),
        rule("ぶ", "んどく", GodanVerb, Toku),
        rule("ぬ", "んどく", GodanVerb, Toku),
        rule("む", "んどく", GodanVerb, Toku),
        rule("る", "とく", IchidanVerb, Toku),
        rule("くる", "きとく", KuruVerb, Toku),
        rule("来る", "来とく", KuruVerb, Toku),
        rule("する", "しとく", SuruVerb, Toku),
        rule("為る", "為とく", SuruVerb, Toku),
        rule("行く", "行っとく", GodanVerb, Toku),
        rule("問う", "問うとく", GodanVerb, Toku),
        rule("請う", "請うとく", GodanVerb, Toku),
        // Imperative
        rule("る", "れ", GodanVerb, Imperative),
        rule("う", "え", GodanVerb, Imperative),
        rule("つ", "て", GodanVerb, Imperative),
        rule("す", "せ", GodanVerb, Imperative),
        rule("く", "け", GodanVerb, Imperative),
        rule("ぐ", "げ", GodanVerb, Imperative),
        rule("ぶ", "べ", GodanVerb, Imperative),
        rule("む", "め", GodanVerb, Imperative),
        rule("ぬ", "ね", GodanVerb, Imperative),
        rule("る", "ろ", IchidanVerb, Imperative),
        rule("る", "よ", IchidanVerb, Imperative),
        rule("くる", "こい", KuruVerb, Imperative),
        rule("来る", "来い", KuruVerb, Imperative),
        rule("する", "しろ", SuruVerb, Imperative),
        rule("為る", "為ろ", SuruVerb, Imperative),
        rule("する", "せよ", SuruVerb, Imperative),
        rule("為る", "為よ", SuruVerb, Imperative),
        // Volitional
        rule("る", "ろう", GodanVerb, Volitional),
        rule("う", "おう", GodanVerb, Volitional),
        rule("つ", "とう", GodanVerb, Volitional),
        rule("す", "そう", GodanVerb, Volitional),
        rule("く", "こう", GodanVerb, Volitional),
        rule("ぐ", "ごう", GodanVerb, Volitional),
        rule("ぶ", "ぼう", GodanVerb, Volitional),
        rule("む", "もう", GodanVerb, Volitional),
        rule("ぬ", "のう", GodanVerb, Volitional),
        rule("る", "よう", IchidanVerb, Volitional),
        rule("くる", "こよう", KuruVerb, Volitional),
        rule("来る", "来よう", KuruVerb, Volitional),
        rule("する", "しよう", SuruVerb, Volitional),
        rule("為る", "為よう", SuruVerb, Volitional),
        // Passive
        rule("る", "られる", GodanVerb, Passive),
        rule("う", "われる", GodanVerb, Passive),
        rule("つ", "たれる", GodanVerb, Passive),
        rule("す", "される", GodanVerb, Passive),
        rule("く", "かれる", GodanVerb, Passive),
        rule("ぐ", "がれる", GodanVerb, Passive),
        rule("ぶ", "ばれる", GodanVerb, Passive),
        rule("む", "まれる", GodanVerb, Passive),
        rule("ぬ", "なれる", GodanVerb, Passive),
        rule("る", "られる", IchidanVerb, PotentialPassive),
        rule("くる", "こられる", KuruVerb, PotentialPassive),
        rule("来る", "来られる", KuruVerb, PotentialPassive),
        rule("する", "される", SuruVerb, Passive),
        rule("為る", "為れる", SuruVerb, Passive),
        // Potential
        rule("る", "れる", GodanVerb, Potential),
        rule("う", "える", GodanVerb, Potential),
        rule("つ", "てる", GodanVerb, Potential),
        rule("す", "せる", GodanVerb, Potential),
        rule("く", "ける", GodanVerb, Potential),
        rule("ぐ", "げる", GodanVerb, Potential),
        rule("ぶ", "べる", GodanVerb, Potential),
        rule("む", "める", GodanVerb, Potential),
        rule("ぬ", "ねる", GodanVerb, Potential),
        rule("る", "れる", IchidanVerb, Potential),
        rule("くる", "これる", KuruVerb, Potential),
        rule("来る", "来れる", KuruVerb, Potential),
        rule("する", "できる", SuruVerb, Potential),
        // Causative
        rule("る", "らせる", GodanVerb, Causative),
        rule("う", "わせる", GodanVerb, Causative),
        rule("つ", "たせる", GodanVerb, Causative),
        rule("す", "させる", GodanVerb, Causative),
        rule("く", "かせる", GodanVerb, Causative),
        rule("ぐ", "がせる", GodanVerb, Causative),
        rule("ぶ", "ばせる", GodanVerb, Causative),
        rule("む", "ませる", GodanVerb, Causative),
        rule("ぬ", "なせる", GodanVerb, Causative),
        rule("る", "させる", IchidanVerb, Causative),
        rule("くる", "こさせる", KuruVerb, Causative),
        rule("来る", "来させる", KuruVerb, Causative),
        rule("する", "させる", SuruVerb, Causative),
        rule("為る", "為せる", SuruVerb, Causative),
        // Ba
        rule("る", "れば", GodanVerb, Ba),
        rule("う", "えば", GodanVerb, Ba),
        rule("つ", "てば", GodanVerb, Ba),
        rule("す", "せば", GodanVerb, Ba),
        rule("く", "けば", GodanVerb, Ba),
        rule("ぐ", "げば", GodanVerb, Ba),
        rule("ぶ", "べば", GodanVerb, Ba),
        rule("む", "めば", GodanVerb, Ba),
        rule("ぬ", "ねば", GodanVerb, Ba),
        rule("る", "れば", IchidanVerb, Ba),
        rule("くる", "くれば", KuruVerb, Ba),
        rule("来る", "来れば", KuruVerb, Ba),
        rule("する", "すれば", SuruVerb, Ba),
        rule("為る", "為れば", SuruVerb, Ba),
        // Zaru
        rule("る", "らざる", GodanVerb, Zaru),
        rule("う", "わざる", GodanVerb, Zaru),
        rule("つ", "たざる", GodanVerb, Zaru),
        rule("す", "さざる", GodanVerb, Zaru),
        rule("く", "かざる", GodanVerb, Zaru),
        rule("ぐ", "がざる", GodanVerb, Zaru),
        rule("ぶ", "ばざる", GodanVerb, Zaru),
        rule("む", "まざる", GodanVerb, Zaru),
        rule("ぬ", "なざる", GodanVerb, Zaru),
        rule("る", "ざる", IchidanVerb, Zaru),
        rule("くる", "こざる", KuruVerb, Zaru),
        rule("来る", "来ざる", KuruVerb, Zaru),
        rule("する", "せざる", SuruVerb, Zaru),
        rule("為る", "為ざる", SuruVerb, Zaru),
        // Neba
        rule("る", "らねば", GodanVerb, Neba),
        rule("う", "わねば", GodanVerb, Neba),
        rule("つ", "たねば", GodanVerb, Neba),
        rule("す", "さねば", GodanVerb, Neba),
        rule("く", "かねば", GodanVerb, Neba),
        rule("ぐ", "がねば", GodanVerb, Neba),
        rule("ぶ", "ばねば", GodanVerb, Neba),
        rule("む", "まねば", GodanVerb, Neba),
        rule("ぬ", "なねば", GodanVerb, Neba),
        rule("る", "ねば", IchidanVerb, Neba),
        rule("くる", "こねば", KuruVerb, Neba),
        rule("来る", "来ねば", KuruVerb, Neba),
        rule("する", "せねば", SuruVerb, Neba),
        rule("為る", "為ねば", SuruVerb, Neba),
        // Zu
        rule("る", "らず", GodanVerb, Zu),
        rule("う", "わず", GodanVerb, Zu),
        rule("つ", "たず", GodanVerb, Zu),
        rule("す", "さず", GodanVerb, Zu),
        rule("く", "かず", GodanVerb, Zu),
        rule("ぐ", "がず", GodanVerb, Zu),
        rule("ぶ", "ばず", GodanVerb, Zu),
        rule("む", "まず", GodanVerb, Zu),
        rule("ぬ", "なず", GodanVerb, Zu),
        rule("る", "ず", IchidanVerb, Zu),
        rule("くる", "こず", KuruVerb, Zu),
        rule("来る", "来ず", KuruVerb, Zu),
        rule("する", "せず", SuruVerb, Zu),
        rule("為る", "為ず", SuruVerb, Zu),
        // Nu
        rule("る", "らぬ", GodanVerb, Nu),
        rule("う", "わぬ", GodanVerb, Nu),
        rule("つ", "たぬ", GodanVerb, Nu),
        rule("す", "さぬ", GodanVerb, Nu),
        rule("く", "かぬ", GodanVerb, Nu),
        rule("ぐ", "がぬ", GodanVerb, Nu),
        rule("ぶ", "ばぬ", GodanVerb, Nu),
        rule("む", "まぬ", GodanVerb, Nu),
        rule("ぬ", "なぬ", GodanVerb, Nu),
        rule("る", "ぬ", IchidanVerb, Nu),
        rule("くる", "こぬ", KuruVerb, Nu),
        rule("来る", "来ぬ", KuruVerb, Nu),
        rule("する", "せぬ", SuruVerb, Nu),
        rule("為る", "為ぬ", SuruVerb, Nu),
        // Colloquial masculine negative
        rule("る", "らん", GodanVerb, ColloquialNegative),
        rule("う", "わん", GodanVerb, ColloquialNegative),
        rule("つ", "たん", GodanVerb, ColloquialNegative),
        rule("す", "さん", GodanVerb, ColloquialNegative),
        rule("く", "かん", GodanVerb, ColloquialNegative),
        rule("ぐ", "がん", GodanVerb, ColloquialNegative),
        rule("ぶ", "ばん", GodanVerb, ColloquialNegative),
        rule("む", "まん", GodanVerb, ColloquialNegative),
        rule("ぬ", "なん", GodanVerb, ColloquialNegative),
        rule("る", "ん", IchidanVerb, ColloquialNegative),
        rule("くる", "こん", KuruVerb, ColloquialNegative),
        rule("来る", "来ん", KuruVerb, ColloquialNegative),
        rule("する", "せん", SuruVerb, ColloquialNegative),
        rule("為る", "為ん", SuruVerb, ColloquialNegative),
        // Colloquial provisional negative
        rule("る", "らなきゃ", GodanVerb, ProvisionalColloquialNegative),
        rule("う", "わなきゃ", GodanVerb, ProvisionalColloquialNegative),
        rule("つ", "たなきゃ", GodanVerb, ProvisionalColloquialNegative),
        rule("す", "さなきゃ", GodanVerb, ProvisionalColloquialNegative),
        rule("く", "かなきゃ", GodanVerb, ProvisionalColloquialNegative),
        rule("ぐ", "がなきゃ", GodanVerb, ProvisionalColloquialNegative),
        rule("ぶ", "ばなきゃ", GodanVerb, ProvisionalColloquialNegative),
        rule("む", "まなきゃ", GodanVerb, ProvisionalColloquialNegative),
        rule("ぬ", "ななきゃ", GodanVerb, ProvisionalColloquialNegative),
        rule("る", "なきゃ", IchidanVerb, ProvisionalColloquialNegative),
        rule("くる", "こなきゃ", KuruVerb, ProvisionalColloquialNegative),
        rule("来る", "来なきゃ", KuruVerb, ProvisionalColloquialNegative),
        rule("する", "しなきゃ", SuruVerb, ProvisionalColloquialNegative),
        rule("為る", "為なきゃ", SuruVerb, ProvisionalColloquialNegative),
        // Imperative negative
        rule("る", "るな", GodanVerb, ImperativeNegative),
        rule("う", "うな", GodanVerb, ImperativeNegative),
        rule("つ", "つな", GodanVerb, ImperativeNegative),
        rule("す", "すな", GodanVerb, ImperativeNegative),
        rule("く", "くな", GodanVerb, ImperativeNegative),
        rule("ぐ", "ぐな", GodanVerb, ImperativeNegative),
        rule("ぶ", "ぶな", GodanVerb, ImperativeNegative),
        rule("む", "むな", GodanVerb, ImperativeNegative),
        rule("ぬ", "ぬな", GodanVerb, ImperativeNegative),
        rule("る", "るな", IchidanVerb, ImperativeNegative),
        rule("くる", "くるな", KuruVerb, ImperativeNegative),
        rule("来る", "来るな", KuruVerb, ImperativeNegative),
        rule("する", "するな", SuruVerb, ImperativeNegative),
        rule("為る", "為るな", SuruVerb, ImperativeNegative),
        // Tari
        rule("る", "ったり", GodanVerb, Tari),
        rule("う", "ったり", GodanVerb, Tari),
        rule("つ", "ったり", GodanVerb, Tari),
        rule("す", "したり", GodanVerb, Tari),
        rule("く", "いたり", GodanVerb, Tari),
        rule("ぐ", "いだり", GodanVerb, Tari),
        rule("ぶ", "んだり", GodanVerb, Tari),
        rule("む", "んだり", GodanVerb, Tari),
        rule("ぬ", "んだり", GodanVerb, Tari),
        rule("る", "たり", IchidanVerb, Tari),
        rule("くる", "きたり", KuruVerb, Tari),
        rule("来る", "来たり", KuruVerb, Tari),
        rule("する", "したり", SuruVerb, Tari),
        rule("為る", "為たり", SuruVerb, Tari),
        rule("行く", "行ったり", GodanVerb, Tari),
        rule("問う", "問うたり", GodanVerb, Tari),
        rule("請う", "請うたり", GodanVerb, Tari),
        // Chau
        rule("る", "っちゃう", GodanVerb, Chau),
        rule("う", "っちゃう", GodanVerb, Chau),
        rule("つ", "っちゃう", GodanVerb, Chau),
        rule("す", "しちゃう", GodanVerb, Chau),
        rule("く", "いちゃう", GodanVerb, Chau),
        rule("ぐ", "いちゃう", GodanVerb, Chau),
        rule("ぶ", "んじゃう", GodanVerb, Chau),
        rule("ぬ", "んじゃう", GodanVerb, Chau),
        rule("む", "んじゃう", GodanVerb, Chau),
        rule("る", "ちゃう", IchidanVerb, Chau),
        rule("くる", "きちゃう", KuruVerb, Chau),
        rule("来る", "来ちゃう", KuruVerb, Chau),
        rule("する", "しちゃう", SuruVerb, Chau),
        rule("為る", "為ちゃう", SuruVerb, Chau),
        rule("行く", "行っちゃう", GodanVerb, Chau),
        rule("問う", "問うちゃう", GodanVerb, Chau),
        rule("請う", "請うちゃう", GodanVerb, Chau),
        // Chimau
        rule("る", "っちまう", GodanVerb, Chimau),
        rule("う", "っちまう", GodanVerb, Chimau),
        rule("つ", "っちまう", GodanVerb, Chimau),
        rule("す", "しちまう", GodanVerb, Chimau),
        rule("く", "いちまう", GodanVerb, Chimau),
        rule("ぐ", "いちまう", GodanVerb, Chimau),
        rule("ぶ", "んじまう", GodanVerb, Chimau),
        rule("ぬ", "んじまう", GodanVerb, Chimau),
        rule("む", "んじまう", GodanVerb, Chimau),
        rule("る", "ちまう", IchidanVerb, Chimau),
        rule("くる", "きちまう", KuruVerb, Chimau),
        rule("来る", "来ちまう", KuruVerb, Chimau),
        rule("する", "しちまう", SuruVerb, Chimau),
        rule("為る", "為ちまう", SuruVerb, Chimau),
        rule("行く", "行っちまう", GodanVerb, Chimau),
        rule("問う", "問うちゃう", GodanVerb, Chimau),
        rule("請う", "請うちゃう", GodanVerb, Chimau),
        // Continuous
        rule("で", "でいる", Te, Continuous),
        rule("て", "ている", Te, Continuous),
        rule("で", "でおる", Te, Continuous),
        rule("て", "ておる", Te, Continuous),
        rule("で", "でる", Te, Continuous),
        rule("て", "てる", Te, Continuous),
        rule("て", "とる", Te, Continuous),
        // Shimau
        rule("で", "でしまう", Te, Shimau),
        rule("て", "てしまう", Te, Shimau),
        // Adjectives
        rule("い", "くて", Adjective, Te),
        rule("い", "く", Adjective, Adverbial),
        rule("い", "くない", Adjective, Negative),
        rule("い", "かった", Adjective, Past),
        rule("い", "ければ", Adjective, Ba),
        rule("い", "くなきゃ", Adjective, ProvisionalColloquialNegative),
        rule("い", "かったら", Adjective, Tara),
        rule("い", "さ", Adjective, Noun),
        rule("い", "そう", Adjective, Sou),
        rule("い", "すぎる", Adjective, Sugiru),
        rule("い", "き", Adjective, Ki),
        rule("い", "かろう", Adjective, Volitional),
        rule("ない", "ねえ", Adjective, E),
        rule("ない", "ねぇ", Adjective, E),
        rule("ない", "ねー", Adjective, E),
        rule("たい", "てえ", Adjective, E),
        rule("たい", "てぇ", Adjective, E),
        rule("たい", "てー", Adjective, E),
        // Conjunctive (masu stem)
        rule("る", "り", GodanVerb, Conjunctive),
        rule("う", "い", GodanVerb, Conjunctive),
        rule("つ", "ち", GodanVerb, Conjunctive),
        rule("す", "し", GodanVerb, Conjunctive),
        rule("く", "き", GodanVerb, Conjunctive),
        rule("ぐ", "ぎ", GodanVerb, Conjunctive),
        rule("ぶ", "び", GodanVerb, Conjunctive),
        rule("む", "み", GodanVerb, Conjunctive),
        rule("ぬ", "に", GodanVerb, Conjunctive),
        rule("る", "", IchidanVerb, Conjunctive),
        rule("くる", "き", KuruVerb, Conjunctive),
        rule("来る", "来", KuruVerb, Conjunctive),
        rule("する", "し", SuruVerb, Conjunctive),
        rule("為る", "為", SuruVerb, Conjunctive),
        // Stem forms
        rule("", "ます", Conjunctive, Polite),
        rule("ます", "ません", Polite, Negative),
        rule("ます", "ました", Polite, Past),
        rule("ます", "ましょう", Polite, Volitional),
        rule("せん", "せんでした", Negative, Past),
        rule("", "たら", Conjunctive, Tara),
        rule("", "たい", Conjunctive, Tai),
        rule("", "なさい", Conjunctive, Nasai),
        rule("", "そう", Conjunctive, Sou),
        rule("", "すぎる", Conjunctive, Sugiru),
    ]
});

/// The result of one deconjugation path: a candidate dictionary form, the
/// original conjugated word it was derived from, and the grammatical chain
/// that connects them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConjugationInfo {
    /// Plain (dictionary) form of the word.
    pub base: String,
    /// The original conjugated word the search started from.
    pub conjugated: String,
    /// Grammatical forms traversed, base-most first.
    pub derivations: Vec<WordForm>,
    /// [`Self::derivations`] rendered as e.g. `"passive « past"`.
    pub derivation_display: String,
}

fn create_derivation(parent: &ConjugationInfo, r: &Rule) -> ConjugationInfo {
    let mut derivations = parent.derivations.clone();
    if derivations.is_empty() {
        derivations.insert(0, r.conjugated_type);
    }
    derivations.insert(0, r.base_type);

    let replacement_start = parent.base.len() - r.conjugated.len();
    let mut child_word = String::with_capacity(replacement_start + r.base.len());
    child_word.push_str(&parent.base[..replacement_start]);
    child_word.push_str(r.base);

    ConjugationInfo {
        base: child_word,
        conjugated: parent.conjugated.clone(),
        derivations,
        derivation_display: String::new(),
    }
}

fn deconjugate_recursive(info: ConjugationInfo, results: &mut Vec<ConjugationInfo>) {
    let word = info.base.clone();
    for r in RULES.iter() {
        let current_form = info.derivations.first().copied().unwrap_or(WordForm::Any);
        if r.conjugated_type != current_form && current_form != WordForm::Any {
            continue;
        }
        if !word.ends_with(r.conjugated) {
            continue;
        }
        let child = create_derivation(&info, r);
        if r.base_type.is_terminal() {
            results.push(child.clone());
            for silent in SILENT_RULES.iter() {
                if silent.conjugated_type != r.base_type {
                    continue;
                }
                if !child.base.ends_with(silent.base) {
                    continue;
                }
                let derived_rule = Rule {
                    base: r.base,
                    conjugated: r.conjugated,
                    base_type: silent.base_type,
                    conjugated_type: r.conjugated_type,
                };
                let derived = create_derivation(&info, &derived_rule);
                deconjugate_recursive(derived, results);
            }
        } else {
            deconjugate_recursive(child, results);
        }
    }
}

fn format_derivation(derivations: &[WordForm]) -> String {
    let mut display_rules: Vec<WordForm> = derivations
        .iter()
        .copied()
        .filter(|f| *f != WordForm::Conjunctive && !f.is_terminal())
        .collect();
    if derivations.last() == Some(&WordForm::Conjunctive) {
        display_rules.push(WordForm::Conjunctive);
    }
    display_rules
        .iter()
        .map(|f| f.display())
        .collect::<Vec<_>>()
        .join(" « ")
}

/// Attempts to deconjugate `query`.
///
/// When `sentence_mode` is set, `query` is treated as a sentence and
/// progressively shortened from the end (dropping one character at a time),
/// so a word embedded at the start of a longer string is still found; when
/// it's unset only the full string is tried as one word.
pub fn deconjugate(query: &str, sentence_mode: bool) -> Vec<ConjugationInfo> {
    let mut results = Vec::new();
    if sentence_mode {
        let chars: Vec<char> = query.chars().collect();
        for end in (1..=chars.len()).rev() {
            let word: String = chars[..end].iter().collect();
            let detail = ConjugationInfo {
                base: word.clone(),
                conjugated: word,
                derivations: Vec::new(),
                derivation_display: String::new(),
            };
            deconjugate_recursive(detail, &mut results);
        }
    } else {
        let detail = ConjugationInfo {
            base: query.to_string(),
            conjugated: query.to_string(),
            derivations: Vec::new(),
            derivation_display: String::new(),
        };
        deconjugate_recursive(detail, &mut results);
    }

    for info in &mut results {
        info.derivation_display = format_derivation(&info.derivations);
    }
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn deconjugates_negative_ichidan() {
        let results = deconjugate("食べない", false);
        assert!(results.iter().any(|r| r.base == "食べる"));
    }

    #[test]
    fn deconjugates_godan_past() {
        let results = deconjugate("飲んだ", false);
        assert!(results.iter().any(|r| r.base == "飲む"));
    }

    #[test]
    fn deconjugates_te_continuous_chain() {
        let results = deconjugate("食べている", false);
        assert!(results.iter().any(|r| r.base == "食べる"));
    }

    #[test]
    fn sentence_mode_tries_every_prefix_length() {
        let results = deconjugate("食べないでください", true);
        assert!(results.iter().any(|r| r.base == "食べる"));
    }

    #[test]
    fn derivation_display_skips_terminal_and_conjunctive_forms() {
        let results = deconjugate("食べさせられた", false);
        let hit = results.iter().find(|r| r.base == "食べる");
        assert!(hit.is_some());
        let display = &hit.unwrap().derivation_display;
        assert!(!display.contains("masu stem"));
    }

    #[test]
    fn non_sentence_mode_does_not_trim_trailing_text() {
        // "食べないで" as a whole word doesn't end in a known conjugated
        // suffix; only sentence mode (which tries "食べない" too) finds it.
        let whole = deconjugate("食べないで", false);
        assert!(!whole.iter().any(|r| r.base == "食べる"));
        let trimmed = deconjugate("食べないで", true);
        assert!(trimmed.iter().any(|r| r.base == "食べる"));
    }
}

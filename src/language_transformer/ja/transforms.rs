//! Japanese conjugation rule table: the [`LanguageTransformDescriptor`] that
//! drives the reverse-conjugation search (spec 4.1). Not exhaustive -- this
//! covers the inflections a subtitle-mining dictionary lookup actually needs
//! to hit dictionary form for (negative, past, te-form, polite register,
//! potential, passive, causative, volitional, imperative, conditionals, tai,
//! and i-adjective endings) rather than every form a full grammar reference
//! lists.

use std::sync::LazyLock;

use super::super::transformer::{
    suffix_inflection, Condition, ConditionMap, LanguageTransformDescriptor, Transform, TransformMap,
};

/// Godan (u-verb) row endings: (dictionary ending, -a, -i, -e, -o, te/ta onbin).
/// Used to generate the negative/masu-stem/potential/passive/causative/volitional
/// rules for each consonant row without repeating the same five rules nine times.
struct GodanRow {
    dict: &'static str,
    a: &'static str,
    i: &'static str,
    e: &'static str,
    o: &'static str,
    te: &'static str,
    ta: &'static str,
}

const GODAN_ROWS: &[GodanRow] = &[
    GodanRow { dict: "う", a: "わ", i: "い", e: "え", o: "お", te: "って", ta: "った" },
    GodanRow { dict: "く", a: "か", i: "き", e: "け", o: "こ", te: "いて", ta: "いた" },
    GodanRow { dict: "ぐ", a: "が", i: "ぎ", e: "げ", o: "ご", te: "いで", ta: "いだ" },
    GodanRow { dict: "す", a: "さ", i: "し", e: "せ", o: "そ", te: "して", ta: "した" },
    GodanRow { dict: "つ", a: "た", i: "ち", e: "て", o: "と", te: "って", ta: "った" },
    GodanRow { dict: "ぬ", a: "な", i: "に", e: "ね", o: "の", te: "んで", ta: "んだ" },
    GodanRow { dict: "ぶ", a: "ば", i: "び", e: "べ", o: "ぼ", te: "んで", ta: "んだ" },
    GodanRow { dict: "む", a: "ま", i: "み", e: "め", o: "も", te: "んで", ta: "んだ" },
    GodanRow { dict: "る", a: "ら", i: "り", e: "れ", o: "ろ", te: "って", ta: "った" },
];

pub static JAPANESE_CONDITIONS: LazyLock<ConditionMap> = LazyLock::new(|| {
    let mut m = ConditionMap::new();
    for (name, is_terminal) in [
        ("v1", true),
        ("v5", true),
        ("vk", true),
        ("vs", true),
        ("vz", true),
        ("adj-i", true),
        ("v", false),
        ("-masu", false),
        ("-te", false),
        ("-ta", false),
        ("-nai", false),
        ("-ba", false),
        ("-tai", false),
        ("-you", false),
        ("-ki", false),
    ] {
        m.insert(name, Condition { name, is_terminal });
    }
    m
});

pub static JAPANESE_TRANSFORMS: LazyLock<TransformMap> = LazyLock::new(|| {
    let mut m = TransformMap::new();

    // masu-stem (polite conjunctive): 食べます -> 食べる, 書きます -> 書く
    let mut masu_stem_rules = Vec::new();
    for row in GODAN_ROWS {
        masu_stem_rules.push(suffix_inflection(
            &format!("{}ます", row.i),
            row.dict,
            &["-masu"],
            &["v5"],
        ));
    }
    masu_stem_rules.push(suffix_inflection("ます", "る", &["-masu"], &["v1"]));
    masu_stem_rules.push(suffix_inflection("きます", "くる", &["-masu"], &["vk"]));
    masu_stem_rules.push(suffix_inflection("します", "する", &["-masu"], &["vs"]));
    m.insert(
        "polite (-masu)",
        Transform { name: "polite (-masu)", description: Some("polite conjunctive stem"), rules: masu_stem_rules },
    );

    // polite negative: 食べません -> 食べる
    let mut masen_rules = Vec::new();
    for row in GODAN_ROWS {
        masen_rules.push(suffix_inflection(&format!("{}ません", row.i), row.dict, &[], &["v5"]));
    }
    masen_rules.push(suffix_inflection("ません", "る", &[], &["v1"]));
    masen_rules.push(suffix_inflection("きません", "くる", &[], &["vk"]));
    masen_rules.push(suffix_inflection("しません", "する", &[], &["vs"]));
    m.insert(
        "polite negative (-masen)",
        Transform { name: "polite negative (-masen)", description: Some("polite negative"), rules: masen_rules },
    );

    // polite past: 食べました -> 食べる
    let mut mashita_rules = Vec::new();
    for row in GODAN_ROWS {
        mashita_rules.push(suffix_inflection(&format!("{}ました", row.i), row.dict, &[], &["v5"]));
    }
    mashita_rules.push(suffix_inflection("ました", "る", &[], &["v1"]));
    mashita_rules.push(suffix_inflection("きました", "くる", &[], &["vk"]));
    mashita_rules.push(suffix_inflection("しました", "する", &[], &["vs"]));
    m.insert(
        "polite past (-mashita)",
        Transform { name: "polite past (-mashita)", description: Some("polite past"), rules: mashita_rules },
    );

    // te-form: 食べて -> 食べる, 書いて -> 書く
    let mut te_rules = Vec::new();
    for row in GODAN_ROWS {
        te_rules.push(suffix_inflection(row.te, row.dict, &["-te"], &["v5"]));
    }
    te_rules.push(suffix_inflection("て", "る", &["-te"], &["v1"]));
    te_rules.push(suffix_inflection("きて", "くる", &["-te"], &["vk"]));
    te_rules.push(suffix_inflection("して", "する", &["-te"], &["vs"]));
    te_rules.push(suffix_inflection("じて", "じる", &["-te"], &["vz"]));
    m.insert("-te", Transform { name: "-te", description: Some("te-form"), rules: te_rules });

    // past (-ta): 食べた -> 食べる, 書いた -> 書く
    let mut ta_rules = Vec::new();
    for row in GODAN_ROWS {
        ta_rules.push(suffix_inflection(row.ta, row.dict, &["-ta"], &["v5"]));
    }
    ta_rules.push(suffix_inflection("た", "る", &["-ta"], &["v1"]));
    ta_rules.push(suffix_inflection("きた", "くる", &["-ta"], &["vk"]));
    ta_rules.push(suffix_inflection("した", "する", &["-ta"], &["vs"]));
    ta_rules.push(suffix_inflection("じた", "じる", &["-ta"], &["vz"]));
    m.insert("past (-ta)", Transform { name: "past (-ta)", description: Some("plain past"), rules: ta_rules });

    // negative (-nai): 食べない -> 食べる, 書かない -> 書く
    let mut nai_rules = Vec::new();
    for row in GODAN_ROWS {
        nai_rules.push(suffix_inflection(&format!("{}ない", row.a), row.dict, &["-nai"], &["v5"]));
    }
    nai_rules.push(suffix_inflection("ない", "る", &["-nai"], &["v1"]));
    nai_rules.push(suffix_inflection("こない", "くる", &["-nai"], &["vk"]));
    nai_rules.push(suffix_inflection("しない", "する", &["-nai"], &["vs"]));
    m.insert("negative (-nai)", Transform { name: "negative (-nai)", description: Some("plain negative"), rules: nai_rules });

    // nai stem -> adj-i (the -nai suffix itself behaves like an i-adjective, so
    // "-nakatta"/"-nakute" chain off the adj-i rules below instead of being
    // duplicated here)
    m.insert(
        "-nai stem is an adjective",
        Transform {
            name: "-nai stem is an adjective",
            description: Some("bridges -nai forms into the i-adjective rule chain"),
            rules: vec![suffix_inflection("ない", "い", &["-nai"], &["adj-i"])],
        },
    );

    // potential: 食べられる/食べれる -> 食べる, 書ける -> 書く
    let mut potential_rules = Vec::new();
    for row in GODAN_ROWS {
        potential_rules.push(suffix_inflection(&format!("{}る", row.e), row.dict, &[], &["v5"]));
    }
    potential_rules.push(suffix_inflection("られる", "る", &[], &["v1"]));
    potential_rules.push(suffix_inflection("れる", "る", &[], &["v1"]));
    potential_rules.push(suffix_inflection("これる", "くる", &[], &["vk"]));
    potential_rules.push(suffix_inflection("できる", "する", &[], &["vs"]));
    m.insert("potential", Transform { name: "potential", description: Some("can do"), rules: potential_rules });

    // passive: 食べられる -> 食べる, 書かれる -> 書く
    let mut passive_rules = Vec::new();
    for row in GODAN_ROWS {
        passive_rules.push(suffix_inflection(&format!("{}れる", row.a), row.dict, &[], &["v5"]));
    }
    passive_rules.push(suffix_inflection("られる", "る", &[], &["v1"]));
    passive_rules.push(suffix_inflection("こられる", "くる", &[], &["vk"]));
    passive_rules.push(suffix_inflection("される", "する", &[], &["vs"]));
    m.insert("passive", Transform { name: "passive", description: Some("is done to"), rules: passive_rules });

    // causative: 食べさせる -> 食べる, 書かせる -> 書く
    let mut causative_rules = Vec::new();
    for row in GODAN_ROWS {
        causative_rules.push(suffix_inflection(&format!("{}せる", row.a), row.dict, &[], &["v5"]));
    }
    causative_rules.push(suffix_inflection("させる", "る", &[], &["v1"]));
    causative_rules.push(suffix_inflection("こさせる", "くる", &[], &["vk"]));
    causative_rules.push(suffix_inflection("させる", "する", &[], &["vs"]));
    m.insert("causative", Transform { name: "causative", description: Some("make/let do"), rules: causative_rules });

    // volitional: 食べよう -> 食べる, 書こう -> 書く
    let mut volitional_rules = Vec::new();
    for row in GODAN_ROWS {
        volitional_rules.push(suffix_inflection(&format!("{}う", row.o), row.dict, &["-you"], &["v5"]));
    }
    volitional_rules.push(suffix_inflection("よう", "る", &["-you"], &["v1"]));
    volitional_rules.push(suffix_inflection("こよう", "くる", &["-you"], &["vk"]));
    volitional_rules.push(suffix_inflection("しよう", "する", &["-you"], &["vs"]));
    m.insert("volitional", Transform { name: "volitional", description: Some("let's do"), rules: volitional_rules });

    // imperative: 食べろ -> 食べる, 書け -> 書く
    let mut imperative_rules = Vec::new();
    for row in GODAN_ROWS {
        imperative_rules.push(suffix_inflection(row.e, row.dict, &[], &["v5"]));
    }
    imperative_rules.push(suffix_inflection("ろ", "る", &[], &["v1"]));
    imperative_rules.push(suffix_inflection("こい", "くる", &[], &["vk"]));
    imperative_rules.push(suffix_inflection("しろ", "する", &[], &["vs"]));
    imperative_rules.push(suffix_inflection("せよ", "する", &[], &["vs"]));
    m.insert("imperative", Transform { name: "imperative", description: Some("command form"), rules: imperative_rules });

    // conditional -ba: 食べれば -> 食べる, 書けば -> 書く
    let mut ba_rules = Vec::new();
    for row in GODAN_ROWS {
        ba_rules.push(suffix_inflection(&format!("{}ば", row.e), row.dict, &["-ba"], &["v5"]));
    }
    ba_rules.push(suffix_inflection("れば", "る", &["-ba"], &["v1"]));
    ba_rules.push(suffix_inflection("くれば", "くる", &["-ba"], &["vk"]));
    ba_rules.push(suffix_inflection("すれば", "する", &["-ba"], &["vs"]));
    m.insert(
        "conditional (-ba)",
        Transform { name: "conditional (-ba)", description: Some("if/when do"), rules: ba_rules },
    );

    // conditional -tara chains off -ta (ta + ら): reuse the -ta suffix table,
    // just with the trailing ら stripped first.
    let mut tara_rules = Vec::new();
    for row in GODAN_ROWS {
        tara_rules.push(suffix_inflection(&format!("{}ら", row.ta), row.dict, &[], &["v5"]));
    }
    tara_rules.push(suffix_inflection("たら", "る", &[], &["v1"]));
    tara_rules.push(suffix_inflection("きたら", "くる", &[], &["vk"]));
    tara_rules.push(suffix_inflection("したら", "する", &[], &["vs"]));
    m.insert(
        "conditional (-tara)",
        Transform { name: "conditional (-tara)", description: Some("if/when did"), rules: tara_rules },
    );

    // tai (want to): 食べたい -> 食べる, 書きたい -> 書く
    let mut tai_rules = Vec::new();
    for row in GODAN_ROWS {
        tai_rules.push(suffix_inflection(&format!("{}たい", row.i), row.dict, &["-tai"], &["v5"]));
    }
    tai_rules.push(suffix_inflection("たい", "る", &["-tai"], &["v1"]));
    tai_rules.push(suffix_inflection("きたい", "くる", &["-tai"], &["vk"]));
    tai_rules.push(suffix_inflection("したい", "する", &["-tai"], &["vs"]));
    m.insert("-tai", Transform { name: "-tai", description: Some("want to do"), rules: tai_rules });
    m.insert(
        "-tai stem is an adjective",
        Transform {
            name: "-tai stem is an adjective",
            description: Some("bridges -tai forms into the i-adjective rule chain"),
            rules: vec![suffix_inflection("たい", "い", &["-tai"], &["adj-i"])],
        },
    );

    // chau/shimau (completive, colloquial te + しまう contraction)
    m.insert(
        "-chau",
        Transform {
            name: "-chau",
            description: Some("colloquial contraction of -te shimau"),
            rules: vec![
                suffix_inflection("ちゃう", "る", &[], &["v1"]),
                suffix_inflection("じゃう", "ぐ", &[], &["v5"]),
                suffix_inflection("っちゃう", "う", &[], &["v5"]),
                suffix_inflection("いちゃう", "く", &[], &["v5"]),
                suffix_inflection("しちゃう", "す", &[], &["v5"]),
            ],
        },
    );

    // i-adjective: past/negative/te/adverbial forms all strip the trailing い
    m.insert(
        "adjective past (-katta)",
        Transform {
            name: "adjective past (-katta)",
            description: Some("plain adjective past"),
            rules: vec![suffix_inflection("かった", "い", &[], &["adj-i"])],
        },
    );
    m.insert(
        "adjective negative (-kunai)",
        Transform {
            name: "adjective negative (-kunai)",
            description: Some("plain adjective negative"),
            rules: vec![suffix_inflection("くない", "い", &["-nai"], &["adj-i"])],
        },
    );
    m.insert(
        "adjective te-form (-kute)",
        Transform {
            name: "adjective te-form (-kute)",
            description: Some("adjective te-form"),
            rules: vec![suffix_inflection("くて", "い", &["-te"], &["adj-i"])],
        },
    );
    m.insert(
        "adjective adverbial (-ku)",
        Transform {
            name: "adjective adverbial (-ku)",
            description: Some("adverbial form"),
            rules: vec![suffix_inflection("く", "い", &["-ki"], &["adj-i"])],
        },
    );

    m
});

pub static JAPANESE_TRANSFORM_DESCRIPTOR: LazyLock<LanguageTransformDescriptor> =
    LazyLock::new(|| LanguageTransformDescriptor {
        conditions: &JAPANESE_CONDITIONS,
        transforms: &JAPANESE_TRANSFORMS,
    });

//! Scripted Nutrition Advisor
//!
//! This module implements the offline response path: a fixed, ordered list of
//! topic rules mapping keywords found in the visitor's question to a canned
//! advisory paragraph. It is deliberately lookup-table logic, not language
//! understanding. The web chat falls back to it whenever the voice vendor is
//! unconfigured or unreachable, so every function here is pure and total.

use tracing::debug;

/// A single topic rule: if any keyword appears in the (lower-cased) input,
/// the rule's advisory paragraph is returned.
struct TopicRule {
    topic: &'static str,
    keywords: &'static [&'static str],
    advice: &'static str,
}

/// The ordered rule list. The first rule whose keyword set matches wins, so
/// this order is part of the contract and must not be rearranged.
const RULES: &[TopicRule] = &[
    TopicRule {
        topic: "weight",
        keywords: &["weight", "obese", "obesity", "overweight", "chubby"],
        advice: "Healthy weight management starts with a precise calorie target rather than \
                 guesswork. I recommend weighing every meal on a gram scale, swapping commercial \
                 treats for low-calorie vegetables such as green beans, and aiming for gradual \
                 loss of one to two percent of body weight per week. Crash dieting is dangerous, \
                 especially in cats, where rapid weight loss can trigger hepatic lipidosis. I'd \
                 be happy to build a tailored weight-loss plan during a consultation.",
    },
    TopicRule {
        topic: "renal",
        keywords: &["kidney", "renal"],
        advice: "For kidney disease, nutrition is one of the most powerful tools we have. Renal \
                 diets restrict phosphorus first and provide moderate amounts of high-quality \
                 protein, along with omega-3 fatty acids to slow progression. Fresh water should \
                 always be available, and wet food helps maintain hydration. Please share your \
                 pet's most recent bloodwork during a consultation so we can match the diet to \
                 the stage of disease.",
    },
    TopicRule {
        topic: "diabetes",
        keywords: &["diabetes", "diabetic", "insulin", "glucose"],
        advice: "Diabetic pets do best on a consistent routine: the same food, in the same \
                 amount, at the same times each day, timed with insulin. For cats, a \
                 low-carbohydrate, high-protein diet can dramatically improve glycemic control \
                 and sometimes leads to remission. For dogs, a consistent fiber-rich diet helps \
                 smooth glucose curves. Bring your glucose logs to a consultation and we can \
                 fine-tune the feeding schedule together.",
    },
    TopicRule {
        topic: "allergy",
        keywords: &["allerg", "itch", "scratching"],
        advice: "True food allergies are usually reactions to a protein the body has seen \
                 before, most often chicken, beef, or dairy. The gold standard for diagnosis is \
                 an eight-to-twelve week elimination trial with a novel or hydrolyzed protein \
                 diet, with absolutely no other treats or flavored medications. Over-the-counter \
                 grain-free foods rarely solve the problem. I can guide you through a properly \
                 controlled elimination trial in a consultation.",
    },
    TopicRule {
        topic: "digestive",
        keywords: &["digest", "diarrh", "vomit", "stomach", "bowel", "constipat"],
        advice: "For digestive upset, the first priorities are hydration and a highly \
                 digestible, low-fat diet fed in small, frequent meals. A sudden diet change is \
                 a common culprit, so food transitions should take seven to ten days. Probiotics \
                 and soluble fiber such as plain canned pumpkin can help firm things up. If \
                 vomiting or diarrhea persists for more than a day or two, please see your \
                 veterinarian promptly, and we can review the diet afterward.",
    },
    TopicRule {
        topic: "growth",
        keywords: &["puppy", "kitten", "growth", "growing"],
        advice: "Puppies and kittens have very different needs from adults: growth diets must \
                 supply controlled calcium and phosphorus, extra protein, and DHA for brain \
                 development. Large-breed puppies in particular need restricted calcium to \
                 protect their joints and should never be free-fed. Choose a diet formulated for \
                 growth, feed measured meals, and track body condition weekly. I can help you \
                 pick the right growth formula during a consultation.",
    },
    TopicRule {
        topic: "senior",
        keywords: &["senior", "older", "aging", "geriatric", "elderly"],
        advice: "Senior pets benefit from diets that protect lean muscle while managing \
                 calories, so adequate high-quality protein matters more with age, not less. \
                 Joint support from omega-3 fatty acids, antioxidants for cognitive health, and \
                 easily chewed textures all help. Because kidney, liver, and dental disease \
                 become more common, a senior bloodwork panel is the best starting point for any \
                 diet change. Let's review your pet's labs together in a consultation.",
    },
    TopicRule {
        topic: "oncology",
        keywords: &["cancer", "tumor", "oncolog", "chemo", "lymphoma"],
        advice: "Nutrition during cancer treatment focuses on maintaining weight and muscle: \
                 calorie-dense, highly palatable food, generous high-quality protein, and \
                 omega-3 fatty acids. Appetite often fluctuates with chemotherapy, so warming \
                 food and offering small frequent meals can make a real difference. No diet \
                 treats cancer itself, and unproven anti-cancer diets can cause harm. I work \
                 alongside your oncology team and can design a supportive feeding plan in a \
                 consultation.",
    },
    TopicRule {
        topic: "cardiac",
        keywords: &["heart", "cardiac", "murmur"],
        advice: "For heart disease, the priorities are controlling sodium, maintaining muscle \
                 mass, and ensuring adequate taurine, particularly since some grain-free, \
                 legume-heavy diets have been linked to diet-associated dilated cardiomyopathy. \
                 Omega-3 fatty acids can help manage cardiac cachexia. Diet changes should be \
                 gradual and coordinated with the medication plan. Please bring the latest \
                 echocardiogram report to a consultation.",
    },
    TopicRule {
        topic: "hepatic",
        keywords: &["liver", "hepatic"],
        advice: "Liver support diets provide moderate amounts of high-quality protein, not \
                 blanket protein restriction unless hepatic encephalopathy is present, along \
                 with extra zinc, vitamin E, and easily digested carbohydrates. Copper-restricted \
                 diets matter for specific conditions such as copper-associated hepatopathy. The \
                 right plan depends entirely on the underlying diagnosis, so please share the \
                 biopsy or imaging results during a consultation.",
    },
    TopicRule {
        topic: "dental",
        keywords: &["dental", "teeth", "tooth", "gum", "tartar"],
        advice: "Dental health starts in the bowl but cannot be fixed there alone. Diets \
                 carrying a Veterinary Oral Health Council seal, kibble textures designed to \
                 scrub, and daily tooth brushing all slow plaque buildup. No diet substitutes \
                 for a professional cleaning once tartar is established. When the mouth is \
                 healthy again, I can recommend a maintenance plan that keeps it that way.",
    },
];

/// Served when no topic rule matches the input.
const GENERIC_ADVICE: &str =
    "Thank you for your question. To give you advice that is actually useful, I need a little \
     more detail: your pet's species, breed, age, current weight, the food you feed now, and \
     any conditions your veterinarian has diagnosed. Could you tell me more about what's going \
     on? For anything urgent, please contact the practice directly.";

/// Returns the name of the first topic rule matching the input, if any.
///
/// Matching is plain substring containment on the lower-cased input.
pub fn matched_topic(input: &str) -> Option<&'static str> {
    let normalized = input.to_lowercase();
    RULES
        .iter()
        .find(|rule| rule.keywords.iter().any(|kw| normalized.contains(kw)))
        .map(|rule| rule.topic)
}

/// Maps free-text input to a canned advisory paragraph.
///
/// Deterministic and total: the same input always yields the same non-empty
/// output, and unmatched input receives a generic clarifying paragraph.
pub fn generate(input: &str) -> &'static str {
    let normalized = input.to_lowercase();
    for rule in RULES {
        if rule.keywords.iter().any(|kw| normalized.contains(kw)) {
            debug!(topic = rule.topic, "scripted advisor matched a topic");
            return rule.advice;
        }
    }
    debug!("scripted advisor found no matching topic");
    GENERIC_ADVICE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recognized_keywords_map_to_their_topic() {
        assert_eq!(matched_topic("my dog has kidney disease"), Some("renal"));
        assert_eq!(matched_topic("she was diagnosed diabetic"), Some("diabetes"));
        assert_eq!(matched_topic("he keeps scratching at night"), Some("allergy"));
        assert_eq!(matched_topic("chronic diarrhea for a week"), Some("digestive"));
        assert_eq!(matched_topic("what should my kitten eat"), Some("growth"));
        assert_eq!(matched_topic("my geriatric cat is picky"), Some("senior"));
        assert_eq!(matched_topic("starting chemo next week"), Some("oncology"));
        assert_eq!(matched_topic("the vet heard a murmur"), Some("cardiac"));
        assert_eq!(matched_topic("elevated liver enzymes"), Some("hepatic"));
        assert_eq!(matched_topic("bad breath and tartar"), Some("dental"));
    }

    #[test]
    fn test_first_matching_rule_wins() {
        // Both "overweight" (rule 1) and "diabetic" (rule 3) match; the
        // earlier rule takes priority.
        assert_eq!(
            matched_topic("my diabetic cat is also overweight"),
            Some("weight")
        );
        assert_eq!(
            generate("my diabetic cat is also overweight"),
            generate("she is overweight")
        );
    }

    #[test]
    fn test_matching_is_case_insensitive() {
        assert_eq!(generate("KIDNEY failure"), generate("kidney failure"));
        assert_eq!(matched_topic("My Dog Is OBESE"), Some("weight"));
    }

    #[test]
    fn test_unmatched_input_gets_generic_paragraph() {
        assert_eq!(matched_topic("hello there"), None);
        assert_eq!(generate("hello there"), GENERIC_ADVICE);
        assert_eq!(generate(""), GENERIC_ADVICE);
    }

    #[test]
    fn test_deterministic_and_never_empty() {
        let inputs = ["kidney", "weight", "zzz unknown zzz", ""];
        for input in inputs {
            let first = generate(input);
            assert_eq!(first, generate(input));
            assert!(!first.is_empty());
        }
    }

    #[test]
    fn test_every_rule_is_reachable() {
        for rule in RULES {
            let probe = rule.keywords[0];
            assert_eq!(
                matched_topic(probe),
                Some(rule.topic),
                "rule '{}' unreachable through its own first keyword",
                rule.topic
            );
            assert!(!rule.advice.is_empty());
        }
    }
}

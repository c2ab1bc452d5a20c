//! Fixed question catalogs for the three questionnaires.
//!
//! Question identifiers are enums so that response maps keyed by them can
//! only ever hold ids from these catalogs; anything else fails when the
//! request payload is parsed.

use serde::{Deserialize, Serialize};

/// Features probed by the Kano questionnaire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KanoFeature {
    ResponseAccuracy,
    ResponseSpeed,
    NaturalConversation,
    ContextMemory,
    Personalization,
    MultiModal,
    ErrorHandling,
    LearningAbility,
    EmotionalIntelligence,
    PrivacyProtection,
}

impl KanoFeature {
    pub const ALL: [KanoFeature; 10] = [
        KanoFeature::ResponseAccuracy,
        KanoFeature::ResponseSpeed,
        KanoFeature::NaturalConversation,
        KanoFeature::ContextMemory,
        KanoFeature::Personalization,
        KanoFeature::MultiModal,
        KanoFeature::ErrorHandling,
        KanoFeature::LearningAbility,
        KanoFeature::EmotionalIntelligence,
        KanoFeature::PrivacyProtection,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            KanoFeature::ResponseAccuracy => "response_accuracy",
            KanoFeature::ResponseSpeed => "response_speed",
            KanoFeature::NaturalConversation => "natural_conversation",
            KanoFeature::ContextMemory => "context_memory",
            KanoFeature::Personalization => "personalization",
            KanoFeature::MultiModal => "multi_modal",
            KanoFeature::ErrorHandling => "error_handling",
            KanoFeature::LearningAbility => "learning_ability",
            KanoFeature::EmotionalIntelligence => "emotional_intelligence",
            KanoFeature::PrivacyProtection => "privacy_protection",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            KanoFeature::ResponseAccuracy => "Response Accuracy",
            KanoFeature::ResponseSpeed => "Response Speed",
            KanoFeature::NaturalConversation => "Natural Conversation",
            KanoFeature::ContextMemory => "Context Memory",
            KanoFeature::Personalization => "Personalization Service",
            KanoFeature::MultiModal => "Multi-modal Interaction",
            KanoFeature::ErrorHandling => "Error Handling",
            KanoFeature::LearningAbility => "Learning Ability",
            KanoFeature::EmotionalIntelligence => "Emotional Intelligence",
            KanoFeature::PrivacyProtection => "Privacy Protection",
        }
    }

    fn functional(&self) -> &'static str {
        match self {
            KanoFeature::ResponseAccuracy => "How do you feel if the AI Agent always accurately understands your questions and provides correct answers?",
            KanoFeature::ResponseSpeed => "How do you feel if the AI Agent can respond to your questions within 1 second?",
            KanoFeature::NaturalConversation => "How do you feel if the AI Agent can engage in natural, flowing conversations like a human?",
            KanoFeature::ContextMemory => "How do you feel if the AI Agent can remember the entire conversation history and maintain contextual coherence?",
            KanoFeature::Personalization => "How do you feel if the AI Agent can provide personalized services based on your preferences and history?",
            KanoFeature::MultiModal => "How do you feel if the AI Agent can handle multiple input types like text, images, and voice?",
            KanoFeature::ErrorHandling => "How do you feel if the AI Agent can proactively apologize and provide solutions when it makes mistakes?",
            KanoFeature::LearningAbility => "How do you feel if the AI Agent can learn from interactions with you and gradually improve service quality?",
            KanoFeature::EmotionalIntelligence => "How do you feel if the AI Agent can understand your emotions and provide appropriate emotional responses?",
            KanoFeature::PrivacyProtection => "How do you feel if the AI Agent can strictly protect your privacy information and transparently explain data usage?",
        }
    }

    fn dysfunctional(&self) -> &'static str {
        match self {
            KanoFeature::ResponseAccuracy => "How do you feel if the AI Agent frequently misunderstands your questions or gives incorrect answers?",
            KanoFeature::ResponseSpeed => "How do you feel if the AI Agent takes more than 10 seconds to respond to your questions?",
            KanoFeature::NaturalConversation => "How do you feel if the AI Agent's responses are stiff and unnatural?",
            KanoFeature::ContextMemory => "How do you feel if the AI Agent cannot remember previous conversation content and requires re-explanation each time?",
            KanoFeature::Personalization => "How do you feel if the AI Agent cannot provide any personalized services and gives the same responses to everyone?",
            KanoFeature::MultiModal => "How do you feel if the AI Agent can only handle pure text input?",
            KanoFeature::ErrorHandling => "How do you feel if the AI Agent does not acknowledge mistakes and continues to insist on incorrect answers?",
            KanoFeature::LearningAbility => "How do you feel if the AI Agent cannot learn or improve at all, repeating the same mistakes?",
            KanoFeature::EmotionalIntelligence => "How do you feel if the AI Agent cannot understand emotions at all and gives cold responses to emotional questions?",
            KanoFeature::PrivacyProtection => "How do you feel if the AI Agent might leak your privacy information and does not explain how data is used?",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct KanoQuestion {
    pub id: KanoFeature,
    pub title: &'static str,
    pub functional: &'static str,
    pub dysfunctional: &'static str,
}

pub fn kano_questions() -> Vec<KanoQuestion> {
    KanoFeature::ALL
        .iter()
        .map(|feature| KanoQuestion {
            id: *feature,
            title: feature.title(),
            functional: feature.functional(),
            dysfunctional: feature.dysfunctional(),
        })
        .collect()
}

/// Answer options shared by both halves of a Kano pair, in scale order.
pub const KANO_ANSWER_OPTIONS: [(u8, &str); 5] = [
    (1, "I like it that way"),
    (2, "It must be that way"),
    (3, "I am neutral"),
    (4, "I can live with it that way"),
    (5, "I dislike it that way"),
];

/// The ten items of the standard SUS instrument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SusItem {
    Q1,
    Q2,
    Q3,
    Q4,
    Q5,
    Q6,
    Q7,
    Q8,
    Q9,
    Q10,
}

impl SusItem {
    pub const ALL: [SusItem; 10] = [
        SusItem::Q1,
        SusItem::Q2,
        SusItem::Q3,
        SusItem::Q4,
        SusItem::Q5,
        SusItem::Q6,
        SusItem::Q7,
        SusItem::Q8,
        SusItem::Q9,
        SusItem::Q10,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            SusItem::Q1 => "q1",
            SusItem::Q2 => "q2",
            SusItem::Q3 => "q3",
            SusItem::Q4 => "q4",
            SusItem::Q5 => "q5",
            SusItem::Q6 => "q6",
            SusItem::Q7 => "q7",
            SusItem::Q8 => "q8",
            SusItem::Q9 => "q9",
            SusItem::Q10 => "q10",
        }
    }

    /// Odd items are favourably phrased, even items are inverted.
    pub fn is_positive(&self) -> bool {
        matches!(
            self,
            SusItem::Q1 | SusItem::Q3 | SusItem::Q5 | SusItem::Q7 | SusItem::Q9
        )
    }

    pub fn text(&self) -> &'static str {
        match self {
            SusItem::Q1 => "I think that I would like to use this AI Agent system frequently",
            SusItem::Q2 => "I found the system unnecessarily complex",
            SusItem::Q3 => "I thought the system was easy to use",
            SusItem::Q4 => "I think that I would need the support of a technical person to be able to use this system",
            SusItem::Q5 => "I found the various functions in this system were well integrated",
            SusItem::Q6 => "I thought there was too much inconsistency in this system",
            SusItem::Q7 => "I would imagine that most people would learn to use this system very quickly",
            SusItem::Q8 => "I found the system very cumbersome to use",
            SusItem::Q9 => "I felt very confident using the system",
            SusItem::Q10 => "I needed to learn a lot of things before I could get going with this system",
        }
    }

    /// Usability area the item measures.
    pub fn area(&self) -> &'static str {
        match self {
            SusItem::Q1 => "User Engagement",
            SusItem::Q2 => "System Complexity",
            SusItem::Q3 => "Ease of Use",
            SusItem::Q4 => "Independent Usage",
            SusItem::Q5 => "Feature Integration",
            SusItem::Q6 => "Consistency",
            SusItem::Q7 => "Learning Curve",
            SusItem::Q8 => "Usage Difficulty",
            SusItem::Q9 => "User Confidence",
            SusItem::Q10 => "Learning Cost",
        }
    }

    pub fn suggestion(&self) -> &'static str {
        match self {
            SusItem::Q1 => "Increase the practical value of the AI Agent so users want to come back to it often",
            SusItem::Q2 => "Simplify the interface and interaction flow to reduce overall complexity",
            SusItem::Q3 => "Rework the interaction design around more intuitive operations",
            SusItem::Q4 => "Improve help documentation and in-product guidance to lower the technical barrier",
            SusItem::Q5 => "Tighten the connections between features so the experience feels unified",
            SusItem::Q6 => "Establish clear design guidelines so interface and interaction stay consistent",
            SusItem::Q7 => "Streamline onboarding so new users learn the system faster",
            SusItem::Q8 => "Redesign cumbersome features and offer simpler alternatives",
            SusItem::Q9 => "Add feedback and error prevention so users feel confident while using the system",
            SusItem::Q10 => "Reduce the prerequisite knowledge needed to get started",
        }
    }

    pub fn strength_label(&self) -> &'static str {
        match self {
            SusItem::Q1 => "High user engagement",
            SusItem::Q2 => "Appropriate system complexity",
            SusItem::Q3 => "Easy to use",
            SusItem::Q4 => "Usable without assistance",
            SusItem::Q5 => "Well integrated features",
            SusItem::Q6 => "Consistent system behaviour",
            SusItem::Q7 => "Easy to learn",
            SusItem::Q8 => "Simple to operate",
            SusItem::Q9 => "Users feel confident",
            SusItem::Q10 => "Low learning cost",
        }
    }

    pub fn weakness_label(&self) -> &'static str {
        match self {
            SusItem::Q1 => "Insufficient user engagement",
            SusItem::Q2 => "System is overly complex",
            SusItem::Q3 => "Difficult to use",
            SusItem::Q4 => "Requires technical support",
            SusItem::Q5 => "Poor feature integration",
            SusItem::Q6 => "Inconsistent system behaviour",
            SusItem::Q7 => "Hard to learn",
            SusItem::Q8 => "Cumbersome to operate",
            SusItem::Q9 => "Users lack confidence",
            SusItem::Q10 => "High learning cost",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SusQuestion {
    pub id: SusItem,
    pub text: &'static str,
    pub positive: bool,
}

pub fn sus_questions() -> Vec<SusQuestion> {
    SusItem::ALL
        .iter()
        .map(|item| SusQuestion {
            id: *item,
            text: item.text(),
            positive: item.is_positive(),
        })
        .collect()
}

pub const LIKERT_OPTIONS: [(u8, &str); 5] = [
    (1, "Strongly Disagree"),
    (2, "Disagree"),
    (3, "Neutral"),
    (4, "Agree"),
    (5, "Strongly Agree"),
];

/// Pillars of the AIPET agentive-UX framework.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AipetDimension {
    Agency,
    Interaction,
    Privacy,
    Experience,
    Trust,
}

impl AipetDimension {
    pub const ALL: [AipetDimension; 5] = [
        AipetDimension::Agency,
        AipetDimension::Interaction,
        AipetDimension::Privacy,
        AipetDimension::Experience,
        AipetDimension::Trust,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            AipetDimension::Agency => "A",
            AipetDimension::Interaction => "I",
            AipetDimension::Privacy => "P",
            AipetDimension::Experience => "E",
            AipetDimension::Trust => "T",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            AipetDimension::Agency => "Agency",
            AipetDimension::Interaction => "Interaction",
            AipetDimension::Privacy => "Privacy",
            AipetDimension::Experience => "Experience",
            AipetDimension::Trust => "Trust",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AipetQuestionId {
    A1,
    A2,
    I1,
    I2,
    P1,
    P2,
    E1,
    E2,
    T1,
    T2,
}

impl AipetQuestionId {
    pub const ALL: [AipetQuestionId; 10] = [
        AipetQuestionId::I1,
        AipetQuestionId::P2,
        AipetQuestionId::T1,
        AipetQuestionId::A1,
        AipetQuestionId::E1,
        AipetQuestionId::T2,
        AipetQuestionId::A2,
        AipetQuestionId::P1,
        AipetQuestionId::I2,
        AipetQuestionId::E2,
    ];

    pub fn dimension(&self) -> AipetDimension {
        match self {
            AipetQuestionId::A1 | AipetQuestionId::A2 => AipetDimension::Agency,
            AipetQuestionId::I1 | AipetQuestionId::I2 => AipetDimension::Interaction,
            AipetQuestionId::P1 | AipetQuestionId::P2 => AipetDimension::Privacy,
            AipetQuestionId::E1 | AipetQuestionId::E2 => AipetDimension::Experience,
            AipetQuestionId::T1 | AipetQuestionId::T2 => AipetDimension::Trust,
        }
    }

    /// The Kano feature whose neutral answer opens this follow-up.
    pub fn trigger(&self) -> KanoFeature {
        match self {
            AipetQuestionId::A1 => KanoFeature::LearningAbility,
            AipetQuestionId::A2 => KanoFeature::MultiModal,
            AipetQuestionId::I1 => KanoFeature::NaturalConversation,
            AipetQuestionId::I2 => KanoFeature::ResponseSpeed,
            AipetQuestionId::P1 => KanoFeature::PrivacyProtection,
            AipetQuestionId::P2 => KanoFeature::PrivacyProtection,
            AipetQuestionId::E1 => KanoFeature::ContextMemory,
            AipetQuestionId::E2 => KanoFeature::Personalization,
            AipetQuestionId::T1 => KanoFeature::ErrorHandling,
            AipetQuestionId::T2 => KanoFeature::ResponseAccuracy,
        }
    }

    pub fn sub_category(&self) -> &'static str {
        match self {
            AipetQuestionId::A1 => "Autonomy Balance",
            AipetQuestionId::A2 => "Capability Boundaries",
            AipetQuestionId::I1 => "Communication Preferences",
            AipetQuestionId::I2 => "Control Spectrum",
            AipetQuestionId::P1 => "Permission Management",
            AipetQuestionId::P2 => "Privacy Concerns",
            AipetQuestionId::E1 => "Cross-device Continuity",
            AipetQuestionId::E2 => "Adaptive Learning",
            AipetQuestionId::T1 => "Conflict Resolution",
            AipetQuestionId::T2 => "Transparency Requirements",
        }
    }

    pub fn text(&self) -> &'static str {
        match self {
            AipetQuestionId::A1 => "When the AI Agent makes autonomous decisions on your behalf, what level of control would you prefer to keep? Describe your ideal balance between AI autonomy and your oversight.",
            AipetQuestionId::A2 => "When the AI Agent meets an unexpected situation, such as input it cannot handle, what boundaries should it respect and when should it hand over to a human?",
            AipetQuestionId::I1 => "Describe your preferred way to tell an AI Agent what you want. Would you rather use structured forms, natural conversation, voice commands, or a combination?",
            AipetQuestionId::I2 => "If you could tune how much the AI Agent does automatically versus what you do manually, walk us through your ideal control spectrum.",
            AipetQuestionId::P1 => "When the AI Agent needs access to your personal information, how would you want to be asked for permission?",
            AipetQuestionId::P2 => "What are your biggest privacy concerns when interacting with an AI Agent, and how should the system address them?",
            AipetQuestionId::E1 => "If you started a task on one device and continued on another days later, what should the AI Agent remember about you and what should it forget?",
            AipetQuestionId::E2 => "How would you want the AI Agent to learn and adapt from your previous interactions? Which personalization helps and which feels intrusive?",
            AipetQuestionId::T1 => "Think about a time you might disagree with the AI Agent's answer or decision. How should it handle that, and what would restore your trust?",
            AipetQuestionId::T2 => "What would the AI Agent need to show or tell you to make you confident its answers are accurate and fair?",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AipetQuestion {
    pub id: AipetQuestionId,
    pub text: &'static str,
    pub dimension: AipetDimension,
    pub sub_category: &'static str,
    pub trigger: KanoFeature,
}

pub fn aipet_questions() -> Vec<AipetQuestion> {
    AipetQuestionId::ALL
        .iter()
        .map(|id| AipetQuestion {
            id: *id,
            text: id.text(),
            dimension: id.dimension(),
            sub_category: id.sub_category(),
            trigger: id.trigger(),
        })
        .collect()
}

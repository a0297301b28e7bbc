//! Fixed engine data: intent catalog, knowledge base, training corpus,
//! sentiment lexicons, stopwords, suggestions, and translation tables.
//!
//! Everything here is immutable at runtime. The catalog order matters:
//! intent matching breaks similarity ties in favor of the earlier entry.

/// One intent catalog entry: trigger phrases plus the response pool drawn
/// from when this intent wins.
pub struct IntentEntry {
    pub triggers: &'static [&'static str],
    pub responses: &'static [&'static str],
}

pub const INTENT_CATALOG: &[IntentEntry] = &[
    IntentEntry {
        triggers: &["hello", "hi", "hey", "good morning", "good evening"],
        responses: &[
            "Hello! Welcome to the studio. How can I help you today?",
            "Hi there! Ask me anything about our design and development work.",
            "Hey! Great to see you. What would you like to know?",
        ],
    },
    IntentEntry {
        triggers: &["bye", "goodbye", "see you", "farewell", "good night"],
        responses: &[
            "Goodbye! Reach out any time you want to build something.",
            "See you soon! Thanks for stopping by the studio.",
            "Take care! We are always here when inspiration strikes.",
        ],
    },
    IntentEntry {
        triggers: &["who are you", "what are you", "your name"],
        responses: &[
            "I am the studio assistant, a small text engine trained on our own knowledge base.",
            "I am an in-house conversational engine built from scratch by the studio team.",
        ],
    },
    IntentEntry {
        triggers: &["what can you do", "help", "capabilities", "how do you work"],
        responses: &[
            "I can explain our services, discuss design and development topics, and analyze files you share.",
            "Ask me about branding, web design, development, or artificial intelligence and I will do my best.",
        ],
    },
    IntentEntry {
        triggers: &["services", "what do you offer", "what does the studio do"],
        responses: &[
            "The studio offers brand identity, web design, product development, and creative technology services.",
            "We design brands, build digital products, and craft interactive experiences end to end.",
        ],
    },
    IntentEntry {
        triggers: &["price", "pricing", "cost", "how much", "quote"],
        responses: &[
            "Pricing depends on project scope. Most brand projects start with a discovery phase.",
            "Every project is scoped individually. Share a brief and we will prepare a quote.",
        ],
    },
    IntentEntry {
        triggers: &["contact", "email", "reach you", "get in touch"],
        responses: &[
            "You can reach the studio through the contact form or by email. We reply within a business day.",
            "The fastest way to get in touch is the contact page. We love hearing about new projects.",
        ],
    },
    IntentEntry {
        triggers: &["thanks", "thank you", "appreciate it"],
        responses: &[
            "You are very welcome! Anything else I can help with?",
            "Happy to help! Ask away if anything else comes to mind.",
        ],
    },
    IntentEntry {
        triggers: &["design", "tell me about design", "visual design"],
        responses: &[
            "Design is the heart of our practice, from typography to motion.",
            "We treat design as problem solving made visible across every medium.",
        ],
    },
    IntentEntry {
        triggers: &["development", "code", "engineering", "programming"],
        responses: &[
            "Our development team builds fast, accessible products with modern tools.",
            "Engineering at the studio means clean code, careful testing, and close design collaboration.",
        ],
    },
    IntentEntry {
        triggers: &["artificial intelligence", "machine learning", "neural network", "ai"],
        responses: &[
            "We experiment with neural networks and language models to power creative tools.",
            "Artificial intelligence fascinates the studio, from tiny text engines like me to generative art.",
        ],
    },
    IntentEntry {
        triggers: &["branding", "brand identity", "logo"],
        responses: &[
            "Branding projects start with strategy, then voice, then the visual system.",
            "A strong brand identity carries a story through every surface it touches.",
        ],
    },
];

pub const GREETING_INDEX: usize = 0;
pub const FAREWELL_INDEX: usize = 1;

/// Topic string -> explanatory paragraph, appended to responses when the
/// query literally contains the topic.
pub const KNOWLEDGE_BASE: &[(&str, &str)] = &[
    (
        "design",
        "Design at the studio spans brand systems, interfaces, and motion. We believe form \
         follows feeling as much as function, and every pixel earns its place.",
    ),
    (
        "development",
        "Development covers web applications, interactive installations, and creative tooling. \
         We favor small, well-tested systems over sprawling frameworks.",
    ),
    (
        "branding",
        "Branding is the craft of giving an idea a recognizable voice. Strategy comes first, \
         then naming, identity, and guidelines that keep the story consistent.",
    ),
    (
        "ai",
        "Our artificial intelligence work is intentionally small scale: hand-rolled networks, \
         word embeddings, and generative text experiments that run entirely in the product.",
    ),
    (
        "web",
        "Web projects range from marketing sites to full product platforms, always built to be \
         fast, accessible, and pleasant to maintain.",
    ),
    (
        "motion",
        "Motion design brings interfaces to life. We prototype transitions early so movement is \
         part of the concept, never an afterthought.",
    ),
    (
        "typography",
        "Typography is the studio's quiet obsession. Typeface selection, rhythm, and hierarchy \
         do most of the communicative work in any design.",
    ),
];

/// Topic tags checked by substring containment against the query.
pub const TOPIC_TAGS: &[&str] = &[
    "design",
    "development",
    "branding",
    "ai",
    "web",
    "motion",
    "typography",
    "pricing",
    "contact",
];

/// The phrases the engine trains its lexicon, embeddings, and Markov table
/// on at construction time.
pub const TRAINING_CORPUS: &[&str] = &[
    "the studio designs brands and digital products",
    "we build fast and accessible web applications",
    "design is problem solving made visible",
    "good typography carries the voice of a brand",
    "our team loves bold ideas and careful craft",
    "every project starts with a discovery phase",
    "we prototype early and test with real people",
    "motion design brings interfaces to life",
    "a strong brand tells a consistent story",
    "the contact form is the fastest way to reach us",
    "we reply to every message within a business day",
    "our developers write clean and tested code",
    "artificial intelligence powers our creative tools",
    "neural networks can generate surprising text",
    "word embeddings capture meaning from context",
    "language models predict the next word in a sentence",
    "the engine learns patterns from a tiny corpus",
    "we experiment with generative art and sound",
    "branding projects begin with strategy and voice",
    "a logo is only the smallest part of an identity",
    "interfaces should feel calm and responsive",
    "we design systems not just screens",
    "accessibility is a requirement not a feature",
    "performance budgets keep our websites fast",
    "the studio works with startups and institutions",
    "great products come from close collaboration",
    "we sketch on paper before touching a screen",
    "color palettes set the emotional tone",
    "grids give layouts their quiet order",
    "white space is a design material",
    "we ship small improvements every week",
    "user research keeps our assumptions honest",
    "prototypes answer questions words cannot",
    "the web is our favorite creative medium",
    "we care about sustainable digital design",
    "every interface tells a story about its maker",
    "simple tools encourage playful exploration",
    "the best feedback comes from real usage",
    "we document decisions so teams stay aligned",
    "creative technology connects art and engineering",
    "our studio hosts workshops on design thinking",
    "illustrations give brands a human touch",
    "sound design is an underused interface layer",
    "we love typefaces with strong personalities",
    "every pixel earns its place in our layouts",
    "design critique makes the work stronger",
    "we iterate until the details feel right",
    "data visualization turns numbers into stories",
    "the studio believes in open source software",
    "we teach what we learn along the way",
    "product strategy aligns business and users",
    "wireframes map the skeleton of an experience",
    "visual identity extends to every surface",
    "naming a product is designing with words",
    "we test interfaces with keyboard and screen reader",
    "animations should explain not decorate",
    "our engineers pair with designers daily",
    "continuous deployment keeps releases calm",
    "we monitor our sites for speed and errors",
    "a design system is a shared language",
    "tokens keep colors and spacing consistent",
    "we version our design files like code",
    "the studio library is full of type specimens",
    "residencies bring new artists into the studio",
    "side projects keep our curiosity alive",
    "machine learning helps us explore form",
    "the text engine answers questions about the studio",
    "it learns from a hardcoded knowledge base",
    "markov chains stitch words into new sentences",
    "tf idf weighting finds the salient words",
    "cosine similarity compares meaning vectors",
    "the network trains with backpropagation",
    "an optimizer adapts each weight separately",
    "dropout keeps the tiny model from memorizing",
    "the generator refines vectors with noise",
    "a policy network nudges the output quality",
    "rewards score coherence topic and sentiment",
    "decoding picks the nearest distinct words",
    "the pipeline runs entirely in the product",
    "no data leaves the page while you chat",
    "we built this assistant from scratch",
    "curiosity is the studio's operating system",
    "deadlines focus the creative process",
    "budgets shape scope not ambition",
    "handoff works best as an ongoing conversation",
    "we archive every project with a retrospective",
    "the best brands evolve without losing themselves",
    "digital gardens grow better than portfolios",
    "we publish case studies about our process",
    "clients join our design critiques",
    "transparency builds trust with every release",
    "we estimate in ranges not promises",
    "scope changes are conversations not conflicts",
    "maintenance is part of every proposal",
    "the studio measures success by usefulness",
    "craft is care made visible",
    "constraints are gifts to the creative mind",
    "we end every week with a show and tell",
    "play is serious research",
    "questions are more valuable than answers",
];

/// Positive sentiment lexicon with strength 1 or 2.
pub const POSITIVE_WORDS: &[(&str, i32)] = &[
    ("good", 1),
    ("nice", 1),
    ("great", 2),
    ("love", 2),
    ("excellent", 2),
    ("amazing", 2),
    ("awesome", 2),
    ("wonderful", 2),
    ("happy", 1),
    ("beautiful", 1),
    ("fantastic", 2),
    ("helpful", 1),
    ("impressive", 1),
    ("brilliant", 2),
    ("perfect", 2),
    ("like", 1),
    ("enjoy", 1),
    ("best", 2),
];

/// Negative sentiment lexicon with strength 1 or 2.
pub const NEGATIVE_WORDS: &[(&str, i32)] = &[
    ("bad", 1),
    ("poor", 1),
    ("terrible", 2),
    ("hate", 2),
    ("awful", 2),
    ("horrible", 2),
    ("sad", 1),
    ("angry", 1),
    ("disappointing", 2),
    ("broken", 1),
    ("worst", 2),
    ("ugly", 1),
    ("slow", 1),
    ("confusing", 1),
    ("useless", 2),
    ("wrong", 1),
];

pub const STOPWORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "but", "of", "to", "in", "on", "at", "for", "with", "is",
    "are", "was", "were", "be", "been", "it", "its", "this", "that", "these", "those", "we",
    "our", "you", "your", "i", "my", "me", "not", "no", "so", "as", "by", "from", "into",
    "about", "than", "then", "ever", "every",
];

/// Example prompts surfaced to the caller. No engine state consulted.
pub const SUGGESTIONS: &[&str] = &[
    "What services does the studio offer?",
    "Tell me about your design process",
    "How does your text engine work?",
    "What is your approach to branding?",
    "How much does a typical project cost?",
    "How can I get in touch?",
];

/// Tiny fixed phrase-substitution translation tables, keyed by language
/// code. Pairs are applied in table order to the final response text.
pub fn translation_table(language: &str) -> Option<&'static [(&'static str, &'static str)]> {
    match language {
        "es" => Some(&[
            ("Hello", "Hola"),
            ("Hi there", "Hola"),
            ("Goodbye", "Adiós"),
            ("Thank you", "Gracias"),
            ("Welcome", "Bienvenido"),
            ("studio", "estudio"),
            ("design", "diseño"),
        ]),
        "fr" => Some(&[
            ("Hello", "Bonjour"),
            ("Hi there", "Salut"),
            ("Goodbye", "Au revoir"),
            ("Thank you", "Merci"),
            ("Welcome", "Bienvenue"),
            ("studio", "atelier"),
            ("design", "design"),
        ]),
        "de" => Some(&[
            ("Hello", "Hallo"),
            ("Hi there", "Hallo"),
            ("Goodbye", "Auf Wiedersehen"),
            ("Thank you", "Danke"),
            ("Welcome", "Willkommen"),
            ("studio", "Studio"),
            ("design", "Design"),
        ]),
        _ => None,
    }
}

pub fn knowledge_for(topic: &str) -> Option<&'static str> {
    KNOWLEDGE_BASE
        .iter()
        .find(|(t, _)| *t == topic)
        .map(|(_, text)| *text)
}

pub fn is_stopword(word: &str) -> bool {
    STOPWORDS.contains(&word)
}

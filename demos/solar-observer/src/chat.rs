//! Canned astronomy answers, chosen by keyword.
//!
//! Matching is a plain substring search on the lowercased question, English
//! and Chinese keywords alike. Topics are tried in a fixed order and the first
//! match wins, so "sun distance from earth" is answered as an earth question.

/// A topic: keywords that select it, refinements tried in order, and a fallback.
struct Topic {
    keywords: &'static [&'static str],
    refinements: &'static [(&'static [&'static str], &'static str)],
    answer: &'static str,
}

const TOPICS: &[Topic] = &[
    Topic {
        keywords: &["太阳系", "solar system"],
        refinements: &[
            (&["多少行星", "几个行星", "行星数量", "how many planets"],
             "The solar system has 8 planets: Mercury, Venus, Earth, Mars, Jupiter, Saturn, Uranus and Neptune. Pluto was reclassified as a dwarf planet in 2006."),
            (&["最大", "largest"],
             "Jupiter is the largest planet in the solar system, about 142,984 km across, more than 11 times the diameter of Earth."),
            (&["最小", "smallest"],
             "Mercury is the smallest planet in the solar system, about 4,879 km across."),
            (&["年龄", "多少岁", "how old"],
             "The solar system is about 4.6 billion years old. It formed from the collapse of a giant molecular cloud."),
        ],
        answer: "The solar system is the planetary system centred on the Sun, with eight planets plus dwarf planets, moons, asteroids and comets.",
    },
    Topic {
        keywords: &["地球", "earth"],
        refinements: &[
            (&["距离太阳", "distance"],
             "Earth is on average about 149.6 million km from the Sun. That distance is called one astronomical unit (AU)."),
            (&["年龄", "多少岁", "how old"],
             "Earth is about 4.54 billion years old."),
            (&["卫星", "moon"],
             "Earth has one natural satellite, the Moon. It is about 3,474 km across, roughly a quarter of Earth's diameter."),
        ],
        answer: "Earth is the third planet from the Sun and the only body known to host life. Water covers 71% of its surface and its atmosphere is rich in oxygen.",
    },
    Topic {
        keywords: &["火星", "mars"],
        refinements: &[
            (&["生命", "life"],
             "No definite signs of life have been found on Mars yet, but evidence of possible liquid water makes past or present life more plausible."),
            (&["殖民", "colonization", "colonisation"],
             "Mars colonization is a possible future goal of space exploration. Several space agencies and private companies are studying how it could be done."),
        ],
        answer: "Mars is the fourth planet from the Sun, the 'red planet', coloured by iron oxide on its surface. It has two small moons, Phobos and Deimos.",
    },
    Topic {
        keywords: &["木星", "jupiter"],
        refinements: &[],
        answer: "Jupiter is the largest planet in the solar system, a gas giant. Its Great Red Spot storm has lasted at least 400 years, and the four largest of its many moons are called the Galilean moons.",
    },
    Topic {
        keywords: &["土星", "saturn"],
        refinements: &[],
        answer: "Saturn is the second largest planet, famous for its rings. They are mostly ice and rock fragments, over 270,000 km wide but only about 10 m thick.",
    },
    Topic {
        keywords: &["宇宙", "universe"],
        refinements: &[
            (&["年龄", "多少岁", "how old"],
             "According to modern cosmology the universe is about 13.8 billion years old."),
            (&["大小", "多大", "size"],
             "The observable universe is about 93 billion light years across. The whole universe may be infinite, or far larger than what we can observe."),
            (&["起源", "开始", "origin", "begin"],
             "According to the Big Bang theory the universe began about 13.8 billion years ago from an extremely hot, dense state, then expanded and cooled into what we see today."),
            (&["黑洞", "black hole"],
             "A black hole is a region of spacetime where gravity is so strong that not even light can escape. Some form when massive stars collapse, and supermassive ones sit at the centres of most galaxies."),
            (&["暗物质", "dark matter"],
             "Dark matter neither emits nor absorbs light but interacts through gravity. It is thought to make up about 27% of the universe's mass-energy."),
            (&["暗能量", "dark energy"],
             "Dark energy is the proposed cause of the universe's accelerating expansion. It is thought to make up about 68% of the universe's mass-energy."),
        ],
        answer: "The universe is the totality of space, time, matter and energy. Modern cosmology holds that it began with the Big Bang and is still expanding.",
    },
    Topic {
        keywords: &["恒星", "star"],
        refinements: &[
            (&["寿命", "life"],
             "A star's lifetime depends on its mass. A Sun-like star lives about 10 billion years, massive stars only a few million, and small red dwarfs may last trillions of years."),
            (&["死亡", "死掉", "die"],
             "How a star dies depends on its mass. Sun-like stars swell into red giants, shed a planetary nebula and leave a white dwarf. Massive stars explode as supernovae, leaving a neutron star or a black hole."),
        ],
        answer: "Stars are huge hot balls of mostly hydrogen and helium that shine by nuclear fusion. There are hundreds of billions of galaxies, each with hundreds of billions of stars.",
    },
    Topic {
        keywords: &["太阳", "sun"],
        refinements: &[
            (&["距离", "distance"],
             "The Sun is on average about 149.6 million km from Earth. Sunlight takes about 8 minutes 20 seconds to reach us."),
            (&["温度", "temperature"],
             "The Sun's surface is about 5,500°C, while its core reaches about 15 million °C."),
            (&["寿命", "life"],
             "The Sun's total lifetime is expected to be about 10 billion years. It is about 4.6 billion years old, with roughly 5 billion years left."),
        ],
        answer: "The Sun is the central body of the solar system, a G-type main sequence star about 1,392,000 km across. It holds 99.86% of the solar system's mass.",
    },
    Topic {
        keywords: &["外星", "alien", "生命", "life"],
        refinements: &[],
        answer: "We have not yet found definite evidence of life beyond Earth. Given the size of the universe, many scientists think other forms of life are likely, and SETI and several space missions are looking for signs of it.",
    },
];

const DEFAULT_ANSWER: &str = "That's an interesting question! I can answer questions about the solar system, the planets, stars, black holes and the universe. Try asking about a specific planet, or about the origin and structure of the universe.";

fn mentions(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| text.contains(k))
}

/// Answer a question. Deterministic and side-effect free.
pub fn respond(text: &str) -> String {
    let text = text.to_lowercase();
    let answer = TOPICS
        .iter()
        .find(|topic| mentions(&text, topic.keywords))
        .map(|topic| {
            topic
                .refinements
                .iter()
                .find(|(keywords, _)| mentions(&text, keywords))
                .map(|(_, answer)| *answer)
                .unwrap_or(topic.answer)
        })
        .unwrap_or(DEFAULT_ANSWER);
    answer.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn routes_topics_and_refinements() {
        assert!(respond("How many planets are in the Solar System?").contains("8 planets"));
        assert!(respond("what is the largest planet in the solar system").starts_with("Jupiter is the largest"));
        assert!(respond("Tell me about Earth's moon").contains("one natural satellite"));
        assert!(respond("is there life on mars?").contains("No definite signs"));
        assert!(respond("SATURN").contains("rings"));
        assert!(respond("what is dark energy in the universe").contains("68%"));
        assert!(respond("how hot is the sun? temperature").contains("5,500"));
    }

    #[test]
    fn chinese_keywords_match() {
        assert!(respond("太阳系有多少行星").contains("8 planets"));
        assert!(respond("木星").starts_with("Jupiter is the largest planet in the solar system, a gas giant"));
        assert!(respond("宇宙的黑洞").contains("black hole"));
    }

    #[test]
    fn earlier_topic_wins() {
        // earth is tried before sun
        assert!(respond("sun and earth distance").contains("astronomical unit"));
    }

    #[test]
    fn alien_life_and_default() {
        assert!(respond("are there aliens?").contains("SETI"));
        assert_eq!(respond("hello"), DEFAULT_ANSWER);
        assert_eq!(respond(""), DEFAULT_ANSWER);
    }

    #[test]
    fn deterministic() {
        assert_eq!(respond("Universe origin"), respond("universe ORIGIN"));
    }
}

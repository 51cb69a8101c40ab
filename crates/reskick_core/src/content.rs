//! crates/reskick_core/src/content.rs
//!
//! Static content for the results-demo tab, the story box and the reading
//! suggestions list.

pub const APP_NAME: &str = "📚 ResKick";
pub const TAGLINE: &str = "Cú hích nhỏ giúp bạn bắt đầu đọc dễ hơn";

pub struct Story {
    pub heading: &'static str,
    pub body: &'static str,
}

pub const STORY: Story = Story {
    heading: "Câu chuyện của chúng mình",
    body: "\"Có lần mình mở một bài báo tiếng Anh… đọc chưa tới 1 phút đã đóng lại vì thấy quá khó. \
Đó là lý do ResKick ra đời — một cú hích nhỏ để bạn bắt đầu.\"",
};

/// Headline result of the reading experiment.
pub struct Metric {
    pub label: &'static str,
    pub value: &'static str,
    pub unit: &'static str,
}

pub const METRICS: [Metric; 3] = [
    Metric {
        label: "Giảm rào cản khởi đầu",
        value: "-1.2",
        unit: "điểm SRI",
    },
    Metric {
        label: "Tần suất bắt đầu đọc",
        value: "+60",
        unit: "%",
    },
    Metric {
        label: "Tự tin hơn",
        value: "85",
        unit: "%",
    },
];

/// One row of the control vs. experimental SRI table.
pub struct SriRow {
    pub label: &'static str,
    pub control: &'static str,
    pub experimental: &'static str,
    pub highlight: bool,
}

pub const SRI_TABLE: [SriRow; 3] = [
    SriRow {
        label: "SRI trước thí nghiệm",
        control: "3.4",
        experimental: "3.5",
        highlight: false,
    },
    SriRow {
        label: "SRI sau thí nghiệm",
        control: "3.3",
        experimental: "2.3",
        highlight: false,
    },
    SriRow {
        label: "Thay đổi",
        control: "-0.1",
        experimental: "-1.2",
        highlight: true,
    },
];

pub struct Testimonial {
    pub text: &'static str,
    pub author: &'static str,
    pub emoji: &'static str,
}

pub const TESTIMONIALS: [Testimonial; 4] = [
    Testimonial {
        text: "Lần đầu mình đọc hết một bài báo tiếng Anh mà không bỏ giữa chừng.",
        author: "Bạn N.H",
        emoji: "🎉",
    },
    Testimonial {
        text: "Đọc tóm tắt xong thấy bài không đáng sợ như mình tưởng.",
        author: "Bạn T.A",
        emoji: "💪",
    },
    Testimonial {
        text: "Có nhóm chat thấy mọi người cũng đọc, mình không muốn bị bỏ lại phía sau.",
        author: "Bạn M.K",
        emoji: "🤝",
    },
    Testimonial {
        text: "Mình không nghĩ một thứ nhỏ như bản tóm tắt lại có thể giúp ích đến vậy.",
        author: "Bạn P.L",
        emoji: "✨",
    },
];

pub struct ReadingSuggestion {
    pub title: &'static str,
    pub source: &'static str,
    pub tags: &'static [&'static str],
    pub difficulty: &'static str,
    pub url: &'static str,
}

pub const SUGGESTIONS_HEADING: &str = "Gợi ý đọc";
pub const SUGGESTIONS_SUBHEADING: &str = "Dựa trên sở thích và lịch sử đọc của bạn";

pub const SUGGESTIONS: [ReadingSuggestion; 4] = [
    ReadingSuggestion {
        title: "How AI is Transforming Education in 2024",
        source: "MIT Technology Review",
        tags: &["AI", "Giáo dục"],
        difficulty: "Trung bình",
        url: "#",
    },
    ReadingSuggestion {
        title: "The Science of Learning: What Research Tells Us",
        source: "Nature",
        tags: &["Tâm lý học", "Học tập"],
        difficulty: "Dễ",
        url: "#",
    },
    ReadingSuggestion {
        title: "Climate Solutions: Technology and Innovation",
        source: "BBC Future",
        tags: &["Môi trường", "Công nghệ"],
        difficulty: "Dễ",
        url: "#",
    },
    ReadingSuggestion {
        title: "Understanding Machine Learning for Beginners",
        source: "Google AI Blog",
        tags: &["AI", "Lập trình"],
        difficulty: "Trung bình",
        url: "#",
    },
];

/// Message shown under the summary once it is on screen.
pub const NEXT_STEP_HINT: &str = "Giờ bạn đã hiểu ý chính rồi! Hãy thử đọc lại bài gốc bằng tiếng Anh. \
Ghi chú những từ mới hoặc ý bạn muốn tìm hiểu thêm nhé.";

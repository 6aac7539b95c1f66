//! Simulated speech stream and its pre-written translations.
//!
//! Nothing here calls a real recognizer or translator: the "speech" is a fixed
//! list of sentences replayed in order and every translation comes from a
//! static table.

use serde::{Deserialize, Serialize};

use crate::language::{EntryLanguage, OutputLanguage};

/// One translated rendering of a source sentence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationEntry {
    pub language: EntryLanguage,
    pub text: String,
}

struct KnownSentence {
    source: &'static str,
    /// Language-neutral fallback for languages missing below
    default: &'static str,
    translations: &'static [(OutputLanguage, &'static str)],
}

impl KnownSentence {
    fn text_for(&self, language: OutputLanguage) -> &'static str {
        self.translations
            .iter()
            .find(|(lang, _)| *lang == language)
            .map_or(self.default, |(_, text)| *text)
    }
}

static SENTENCES: [KnownSentence; 6] = [
    KnownSentence {
        source: "안녕하세요. 오늘은 웹 프로그래밍에 대해 배워보겠습니다.",
        default: "Hello. Today we will learn about web programming.",
        translations: &[
            (OutputLanguage::English, "Hello. Today we will learn about web programming."),
            (OutputLanguage::Chinese, "你好。今天我们将学习网络编程。"),
            (OutputLanguage::Japanese, "こんにちは。今日はウェブプログラミングについて学びます。"),
            (OutputLanguage::Vietnamese, "Xin chào. Hôm nay chúng ta sẽ học về lập trình web."),
        ],
    },
    KnownSentence {
        source: "먼저 HTML과 CSS의 기본 개념을 설명하겠습니다.",
        default: "First, I will explain the basic concepts of HTML and CSS.",
        translations: &[
            (OutputLanguage::English, "First, I will explain the basic concepts of HTML and CSS."),
            (OutputLanguage::Chinese, "首先，我将解释HTML和CSS的基本概念。"),
            (OutputLanguage::Japanese, "まず、HTMLとCSSの基本概念を説明します。"),
            (OutputLanguage::Vietnamese, "Đầu tiên, tôi sẽ giải thích các khái niệm cơ bản của HTML và CSS."),
        ],
    },
    KnownSentence {
        source: "HTML은 웹 페이지의 구조를 정의하는 마크업 언어입니다.",
        default: "HTML is a markup language that defines the structure of web pages.",
        translations: &[
            (OutputLanguage::English, "HTML is a markup language that defines the structure of web pages."),
            (OutputLanguage::Chinese, "HTML是定义网页结构的标记语言。"),
            (OutputLanguage::Japanese, "HTMLは、ウェブページの構造を定義するマークアップ言語です。"),
            (OutputLanguage::Vietnamese, "HTML là ngôn ngữ đánh dấu định nghĩa cấu trúc của các trang web."),
        ],
    },
    KnownSentence {
        source: "CSS는 웹 페이지의 스타일을 정의하는 스타일시트 언어입니다.",
        default: "CSS is a stylesheet language that defines the style of web pages.",
        translations: &[
            (OutputLanguage::English, "CSS is a stylesheet language that defines the style of web pages."),
            (OutputLanguage::Chinese, "CSS是定义网页样式的样式表语言。"),
            (OutputLanguage::Japanese, "CSSは、ウェブページのスタイルを定義するスタイルシート言語です。"),
            (OutputLanguage::Vietnamese, "CSS là ngôn ngữ bảng định kiểu định nghĩa phong cách của các trang web."),
        ],
    },
    KnownSentence {
        source: "JavaScript는 웹 페이지에 동적인 기능을 추가하는 프로그래밍 언어입니다.",
        default: "JavaScript is a programming language that adds dynamic functionality to web pages.",
        translations: &[
            (OutputLanguage::English, "JavaScript is a programming language that adds dynamic functionality to web pages."),
            (OutputLanguage::Chinese, "JavaScript是一种为网页添加动态功能的编程语言。"),
            (OutputLanguage::Japanese, "JavaScriptは、ウェブページに動的な機能を追加するプログラミング言語です。"),
            (OutputLanguage::Vietnamese, "JavaScript là ngôn ngữ lập trình thêm chức năng động vào các trang web."),
        ],
    },
    KnownSentence {
        source: "오늘 수업은 여기까지입니다. 다음 시간에 뵙겠습니다.",
        default: "That's all for today's class. See you next time.",
        translations: &[
            (OutputLanguage::English, "That's all for today's class. See you next time."),
            (OutputLanguage::Chinese, "今天的课程到此结束。下次见。"),
            (OutputLanguage::Japanese, "今日の授業はここまでです。次回お会いしましょう。"),
            (OutputLanguage::Vietnamese, "Đó là tất cả cho lớp học hôm nay. Hẹn gặp lại lần sau."),
        ],
    },
];

/// Number of sentences in the simulated speech stream.
pub fn sentence_count() -> usize {
    SENTENCES.len()
}

/// Sentence played at position `index` of the stream, wrapping around.
pub fn sample_sentence(index: usize) -> &'static str {
    SENTENCES[index % SENTENCES.len()].source
}

fn placeholder(sentence: &str) -> String {
    format!("[Translated: {sentence}]")
}

/// Translates `sentence` into each of `languages`, in order.
///
/// Sentences outside the table get a `[Translated: ...]` placeholder per
/// language. An empty language list yields a single `default` entry.
pub fn translate(sentence: &str, languages: &[OutputLanguage]) -> Vec<TranslationEntry> {
    let known = SENTENCES.iter().find(|s| s.source == sentence);

    if languages.is_empty() {
        let text = known.map_or_else(|| placeholder(sentence), |s| s.default.to_string());
        return vec![TranslationEntry {
            language: EntryLanguage::Default,
            text,
        }];
    }

    languages
        .iter()
        .map(|&lang| TranslationEntry {
            language: lang.into(),
            text: match known {
                Some(s) => s.text_for(lang).to_string(),
                None => placeholder(sentence),
            },
        })
        .collect()
}

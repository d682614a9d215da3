//! User-Agent device classification
//!
//! Combines woothee's parsed category with keyword fallbacks, because
//! woothee does not separate tablets from smartphones and older dashboard
//! clients send UA strings woothee does not know.

use woothee::parser::Parser;

use crate::store::DeviceClass;

/// 平板关键字（woothee 不区分平板，先用关键字兜底）
const TABLET_KEYWORDS: [&str; 4] = ["tablet", "ipad", "playbook", "silk"];

const MOBILE_KEYWORDS: [&str; 9] = [
    "mobile",
    "iphone",
    "ipod",
    "android",
    "blackberry",
    "opera mini",
    "windows ce",
    "palm",
    "iemobile",
];

/// 从 User-Agent 推断设备分类，无法识别时默认 desktop
pub fn classify_device(user_agent: &str) -> DeviceClass {
    let ua_lower = user_agent.to_lowercase();

    if TABLET_KEYWORDS.iter().any(|kw| ua_lower.contains(kw)) {
        return DeviceClass::Tablet;
    }

    if let Some(parsed) = Parser::new().parse(user_agent) {
        match parsed.category {
            "smartphone" | "mobilephone" => return DeviceClass::Mobile,
            "pc" => return DeviceClass::Desktop,
            _ => {}
        }
    }

    if MOBILE_KEYWORDS.iter().any(|kw| ua_lower.contains(kw)) {
        return DeviceClass::Mobile;
    }

    DeviceClass::Desktop
}

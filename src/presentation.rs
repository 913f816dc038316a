//! Badge styling for categories.
//!
//! Tokens are utility-class names (`bg-*`, `text-*`, `border-*`) consumed as-is
//! by the rendering side.

use serde::Serialize;

use crate::domain::{category_info, Category, CategoryInfo};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ColorClasses {
    pub bg: &'static str,
    pub text: &'static str,
    pub border: &'static str,
}

pub const fn color_classes(category: Category) -> ColorClasses {
    let (bg, text, border) = match category {
        Category::Work => ("bg-blue-100", "text-blue-800", "border-blue-200"),
        Category::Personal => ("bg-green-100", "text-green-800", "border-green-200"),
        Category::Promotions => ("bg-purple-100", "text-purple-800", "border-purple-200"),
        Category::Urgent => ("bg-red-100", "text-red-800", "border-red-200"),
        Category::Bills => ("bg-orange-100", "text-orange-800", "border-orange-200"),
        Category::Social => ("bg-pink-100", "text-pink-800", "border-pink-200"),
        Category::Newsletters => ("bg-indigo-100", "text-indigo-800", "border-indigo-200"),
        Category::Travel => ("bg-cyan-100", "text-cyan-800", "border-cyan-200"),
        Category::Shopping => ("bg-yellow-100", "text-yellow-800", "border-yellow-200"),
        Category::Security => ("bg-emerald-100", "text-emerald-800", "border-emerald-200"),
        Category::Spam => ("bg-gray-100", "text-gray-800", "border-gray-200"),
        Category::General => ("bg-slate-100", "text-slate-800", "border-slate-200"),
    };
    ColorClasses { bg, text, border }
}

/// Everything a renderer needs to draw a category badge.
#[derive(Debug, Clone, Serialize)]
pub struct Badge {
    pub info: &'static CategoryInfo,
    pub colors: ColorClasses,
}

impl Badge {
    pub fn for_category(category: Category) -> Self {
        Self {
            info: category_info(category),
            colors: color_classes(category),
        }
    }
}

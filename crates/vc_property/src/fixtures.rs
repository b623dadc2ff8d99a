//! Object graphs shared by the unit tests.

use core::fmt;
use core::str::FromStr;
use std::collections::HashMap;

use crate::convert::{ConvertError, ConvertWith, Converter};
use crate::{Reflect, impl_reflect_opaque};
use crate::info::TypeInfo;
use crate::members::MemberTable;

#[derive(Reflect, Default, Debug, PartialEq)]
#[reflect(default)]
pub struct Address {
    #[reflect(@"locality")]
    pub city: String,
    pub zip: u32,
}

#[derive(Reflect, Default, Debug)]
#[reflect(default, members = Self::accessors)]
pub struct User {
    pub name: String,
    pub age: u32,
    pub nickname: Option<String>,
    pub address: Option<Address>,
    pub email: String,
    #[reflect(@"counter")]
    pub visits: HashMap<String, u32>,
    #[reflect(skip)]
    pub verified: bool,
    #[reflect(skip)]
    pub secret: String,
}

impl User {
    fn accessors(table: &mut MemberTable<Self>) {
        table.getter("getEmail", |u| Some(&u.email), |u| Some(&mut u.email));
        table.setter("setEmail", |u, email: String| u.email = email.trim().to_lowercase());
        table.getter("is_verified", |u| Some(&u.verified), |u| Some(&mut u.verified));
        // Not an accessor name.
        table.getter("secret", |u| Some(&u.secret), |u| Some(&mut u.secret));
    }
}

#[derive(Reflect, Default, Debug, Clone, PartialEq)]
#[reflect(default)]
pub struct Line {
    pub sku: String,
    pub qty: u32,
}

impl Line {
    pub fn new(sku: &str, qty: u32) -> Self {
        Self {
            sku: sku.to_owned(),
            qty,
        }
    }
}

#[derive(Reflect, Default, Debug)]
#[reflect(default, members = Self::accessors)]
pub struct Order {
    pub items: Option<Box<[Line]>>,
    pub notes: Vec<String>,
    pub tags: Vec<String>,
    pub scores: HashMap<i32, i32>,
    #[reflect(skip)]
    pub lines: Vec<Line>,
}

impl Order {
    fn accessors(table: &mut MemberTable<Self>) {
        table.indexed_getter::<usize, Line>("getLine", Self::line, Self::line_mut);
        table.indexed_setter::<usize, Line>("setLine", Self::set_line);
    }

    fn line(&self, index: &usize) -> Option<&Line> {
        self.lines.get(*index)
    }

    fn line_mut(&mut self, index: &usize) -> Option<&mut Line> {
        self.lines.get_mut(*index)
    }

    fn set_line(&mut self, index: &usize, line: Line) {
        if self.lines.len() <= *index {
            self.lines.resize_with(*index + 1, Line::default);
        }
        self.lines[*index] = line;
    }
}

/// Sizes written as a number of bytes or of kibibytes, `2k`.
pub struct SizeConverter;

impl Converter for SizeConverter {
    fn parse(&self, _: &'static TypeInfo, raw: &str) -> Result<Box<dyn Reflect>, ConvertError> {
        let raw = raw.trim();
        let (digits, scale) = match raw.strip_suffix('k') {
            Some(digits) => (digits, 1024),
            None => (raw, 1),
        };
        let size: u64 = digits.parse().map_err(ConvertError::new)?;
        Ok(Box::new(size * scale))
    }

    fn format(&self, value: &dyn Reflect) -> Result<String, ConvertError> {
        let size = value
            .downcast_ref::<u64>()
            .ok_or_else(|| ConvertError::new("not a size"))?;
        Ok(match size % 1024 {
            0 if *size > 0 => format!("{}k", size / 1024),
            _ => size.to_string(),
        })
    }
}

#[derive(Reflect, Default, Debug)]
#[reflect(default)]
pub struct Upload {
    #[reflect(@ConvertWith::new(SizeConverter))]
    pub size: u64,
    pub limit: u64,
}

/// Both fields are shadowed by properties missing one accessor.
#[derive(Reflect, Default, Debug)]
#[reflect(default, members = Self::accessors)]
pub struct Account {
    pub pin: String,
    pub created: u64,
}

impl Account {
    fn accessors(table: &mut MemberTable<Self>) {
        table.setter("setPin", |a, pin: String| a.pin = format!("hashed:{pin}"));
        table.getter("getCreated", |a| Some(&a.created), |a| Some(&mut a.created));
    }
}

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    #[default]
    Free,
    Team,
    Enterprise,
}

impl FromStr for Tier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, String> {
        match s {
            "free" => Ok(Self::Free),
            "team" => Ok(Self::Team),
            "enterprise" => Ok(Self::Enterprise),
            _ => Err(format!("unknown tier `{s}`")),
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Free => "free",
            Self::Team => "team",
            Self::Enterprise => "enterprise",
        })
    }
}

impl_reflect_opaque!(Tier: Default);

#[derive(Reflect, Default, Debug, PartialEq)]
#[reflect(default)]
pub struct Plan {
    pub owner: String,
    pub seats: u32,
    pub price: f64,
    pub tier: Tier,
    pub trial: Option<bool>,
}

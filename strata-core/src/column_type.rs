use crate::{AsValue, DomainError, Value};

/// Portable column type, rendered by each dialect's writer.
///
/// Display widths are kept on integer kinds only because MySQL prints them, other backends ignore
/// them.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeKind {
    BigInt(Option<u32>),
    Binary(u32),
    Bit(Option<u32>),
    Blob,
    Char(u32),
    Date,
    Datetime,
    Decimal { precision: u32, scale: u32 },
    Double,
    Float,
    Int(Option<u32>),
    Json,
    LongText,
    MediumInt(Option<u32>),
    MediumText,
    SmallInt(Option<u32>),
    Text,
    TinyInt(Option<u32>),
    Varchar(u32),
}

/// Column type with its nullability, default and comment.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnType {
    pub kind: TypeKind,
    pub nullable: bool,
    pub default: Option<Value>,
    pub comment: Option<String>,
}

macro_rules! simple_types {
    ($($name:ident => $kind:expr),+ $(,)?) => {
        $(
            pub fn $name() -> Self {
                Self::of($kind)
            }
        )+
    };
}

impl ColumnType {
    pub fn of(kind: TypeKind) -> Self {
        Self {
            kind,
            nullable: false,
            default: None,
            comment: None,
        }
    }

    simple_types! {
        bigint => TypeKind::BigInt(None),
        blob => TypeKind::Blob,
        date => TypeKind::Date,
        datetime => TypeKind::Datetime,
        double => TypeKind::Double,
        float => TypeKind::Float,
        int => TypeKind::Int(None),
        json => TypeKind::Json,
        longtext => TypeKind::LongText,
        mediumint => TypeKind::MediumInt(None),
        mediumtext => TypeKind::MediumText,
        smallint => TypeKind::SmallInt(None),
        text => TypeKind::Text,
        tinyint => TypeKind::TinyInt(None),
    }

    pub fn binary(length: u32) -> Self {
        Self::of(TypeKind::Binary(length))
    }
    pub fn bit(length: u32) -> Self {
        Self::of(TypeKind::Bit(Some(length)))
    }
    pub fn char(length: u32) -> Self {
        Self::of(TypeKind::Char(length))
    }
    pub fn varchar(length: u32) -> Self {
        Self::of(TypeKind::Varchar(length))
    }
    pub fn decimal(precision: u32, scale: u32) -> Result<Self, DomainError> {
        if scale > precision {
            return Err(DomainError::DecimalScale { precision, scale });
        }
        Ok(Self::of(TypeKind::Decimal { precision, scale }))
    }

    /// Set the display width of integer and bit kinds, ignored by the others.
    #[must_use]
    pub fn sized(mut self, size: u32) -> Self {
        match &mut self.kind {
            TypeKind::BigInt(v)
            | TypeKind::Bit(v)
            | TypeKind::Int(v)
            | TypeKind::MediumInt(v)
            | TypeKind::SmallInt(v)
            | TypeKind::TinyInt(v) => *v = Some(size),
            _ => {}
        }
        self
    }
    #[must_use]
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }
    #[must_use]
    pub fn default(mut self, value: impl AsValue) -> Self {
        self.default = Some(value.as_value());
        self
    }
    #[must_use]
    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decimal_scale_is_validated() {
        assert!(ColumnType::decimal(10, 2).is_ok());
        assert_eq!(
            ColumnType::decimal(2, 3),
            Err(DomainError::DecimalScale {
                precision: 2,
                scale: 3
            })
        );
    }

    #[test]
    fn modifiers() {
        let column = ColumnType::int().sized(11).nullable().default(0);
        assert_eq!(column.kind, TypeKind::Int(Some(11)));
        assert!(column.nullable);
        assert_eq!(column.default, Some(Value::Int(0)));
        assert_eq!(ColumnType::text().sized(3).kind, TypeKind::Text);
    }
}

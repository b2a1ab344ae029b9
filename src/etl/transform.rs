//! Transformer trait for data transformation

use eyre::Result;

/// Transformer trait for transforming data items
///
/// Implementors define how to transform items:
/// - Data cleaning (normalizing a text column)
/// - Dropping columns
/// - Projecting loosely typed rows onto typed records
///
/// # Example
/// ```
/// use roster_publisher::etl::Transformer;
/// use eyre::Result;
///
/// struct Uppercase;
///
/// impl Transformer for Uppercase {
///     type Input = String;
///     type Output = String;
///
///     fn transform(&self, input: Self::Input) -> Result<Self::Output> {
///         Ok(input.to_uppercase())
///     }
/// }
///
/// assert_eq!(Uppercase.transform("abc".to_string()).unwrap(), "ABC");
/// ```
pub trait Transformer: Send + Sync {
    /// Input item type
    type Input: Send;

    /// Output item type after transformation
    type Output: Send;

    /// Transform a single item
    ///
    /// # Errors
    /// Returns an error if transformation fails (validation, conversion, etc.)
    fn transform(&self, input: Self::Input) -> Result<Self::Output>;

    /// Transform multiple items (default batch implementation)
    ///
    /// Override this for optimized batch processing
    fn transform_many(&self, inputs: Vec<Self::Input>) -> Result<Vec<Self::Output>> {
        inputs.into_iter().map(|i| self.transform(i)).collect()
    }

    /// Feed the output of this transformer into `next`
    fn then<N>(self, next: N) -> Chain<Self, N>
    where
        Self: Sized,
        N: Transformer<Input = Self::Output>,
    {
        Chain {
            first: self,
            second: next,
        }
    }
}

/// Two transformers applied one after the other
///
/// Built with [`Transformer::then`].
pub struct Chain<A, B> {
    first: A,
    second: B,
}

impl<A, B> Transformer for Chain<A, B>
where
    A: Transformer,
    B: Transformer<Input = A::Output>,
{
    type Input = A::Input;
    type Output = B::Output;

    fn transform(&self, input: Self::Input) -> Result<Self::Output> {
        self.second.transform(self.first.transform(input)?)
    }

    fn transform_many(&self, inputs: Vec<Self::Input>) -> Result<Vec<Self::Output>> {
        let intermediate = self.first.transform_many(inputs)?;
        self.second.transform_many(intermediate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct AddOne;

    impl Transformer for AddOne {
        type Input = i32;
        type Output = i32;
        fn transform(&self, input: Self::Input) -> Result<Self::Output> {
            Ok(input + 1)
        }
    }

    struct Stringify;

    impl Transformer for Stringify {
        type Input = i32;
        type Output = String;
        fn transform(&self, input: Self::Input) -> Result<Self::Output> {
            Ok(input.to_string())
        }
    }

    struct RejectNegative;

    impl Transformer for RejectNegative {
        type Input = i32;
        type Output = i32;
        fn transform(&self, input: Self::Input) -> Result<Self::Output> {
            if input < 0 {
                eyre::bail!("negative value: {}", input);
            }
            Ok(input)
        }
    }

    #[test]
    fn test_chain_applies_in_order() {
        let chain = AddOne.then(Stringify);
        let output = chain.transform_many(vec![1, 2, 3]).unwrap();
        assert_eq!(output, vec!["2", "3", "4"]);
    }

    #[test]
    fn test_chain_stops_on_first_error() {
        let chain = RejectNegative.then(AddOne);
        let err = chain.transform_many(vec![1, -5, 3]).unwrap_err();
        assert!(err.to_string().contains("negative value: -5"));
    }
}

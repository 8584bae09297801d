use cmul_device::{Kernel, KernelFault, ReadAccess, WriteAccess};
use cmul_math::{multiply_as, ComplexFixed, Format};

/// One complex multiply bound to its staged operands and output slot.
pub struct ComplexMultiplyKernel {
    pub a: ReadAccess<ComplexFixed>,
    pub b: ReadAccess<ComplexFixed>,
    pub out: WriteAccess<ComplexFixed>,
    /// Declared format of the output buffer
    pub format: Format,
}

impl Kernel for ComplexMultiplyKernel {
    fn name(&self) -> &str {
        "complex_mult"
    }

    fn run(self: Box<Self>) -> Result<(), KernelFault> {
        let product = multiply_as(self.a.get(), self.b.get(), self.format)
            .map_err(|e| KernelFault(e.to_string()))?;
        self.out.write(product);
        Ok(())
    }
}

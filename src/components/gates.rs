/// Combinational boolean functions behind the gate components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Gate {
    Not,
    And,
    Or,
    Nand,
    Nor,
    Xor,
    Xnor,
}

impl Gate {
    pub fn arity(&self) -> usize {
        match self {
            Gate::Not => 1,
            _ => 2,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Gate::Not => "NOT",
            Gate::And => "AND",
            Gate::Or => "OR",
            Gate::Nand => "NAND",
            Gate::Nor => "NOR",
            Gate::Xor => "XOR",
            Gate::Xnor => "XNOR",
        }
    }

    /// Evaluates the gate. Missing inputs read as low.
    pub fn eval(&self, inputs: &[bool]) -> bool {
        let a = inputs.first().copied().unwrap_or(false);
        let b = inputs.get(1).copied().unwrap_or(false);

        match self {
            Gate::Not => !a,
            Gate::And => a && b,
            Gate::Or => a || b,
            Gate::Nand => !(a && b),
            Gate::Nor => !(a || b),
            Gate::Xor => a != b,
            Gate::Xnor => a == b,
        }
    }

    /// All input combinations in counting order, paired with the output.
    pub fn truth_table(&self) -> Vec<(Vec<bool>, bool)> {
        let n = self.arity();
        (0..1u8 << n)
            .map(|row| {
                let inputs: Vec<bool> = (0..n).map(|bit| row >> (n - 1 - bit) & 1 == 1).collect();
                let out = self.eval(&inputs);
                (inputs, out)
            })
            .collect()
    }
}

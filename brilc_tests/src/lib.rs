// Integration and property tests live under tests/.
